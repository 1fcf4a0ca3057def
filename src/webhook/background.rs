//! Fire-and-forget delivery for request handlers.
//!
//! A failed notification must never fail or hold up the operation that
//! triggered it, so handlers hand the payload to [`spawn_delivery`] and move on.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{DeliveryError, WebhookPayload, WebhookSender};

/// Runs a delivery sequence on its own tokio task.
///
/// The terminal outcome is only logged: an unconfigured destination at
/// debug level, any other failure at error level. The returned handle
/// resolves once the sequence finishes and may be dropped.
pub fn spawn_delivery<W>(sender: Arc<W>, payload: WebhookPayload, destination: String) -> JoinHandle<()>
where
    W: WebhookSender + 'static,
{
    let secret_id = payload.secret_id.clone();

    tokio::spawn(async move {
        match sender.deliver(payload, &destination).await {
            Ok(()) => {}
            Err(DeliveryError::NotConfigured) => {
                tracing::debug!(secret_id = %secret_id, "Webhook URL not configured, skipping notification");
            }
            Err(e) => {
                tracing::error!(
                    attempts = e.attempts(),
                    error = %e,
                    secret_id = %secret_id,
                    "Webhook delivery failed"
                );
            }
        }
    })
}
