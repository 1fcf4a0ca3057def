//! Application execution logic.
//!
//! Builds the notifier from validated configuration and performs a single
//! delivery sequence for the payload given on the command line.

use thiserror::Error;

use yopass_webhook::config::{SendArgs, ValidatedConfig};
use yopass_webhook::webhook::{
    DeliveryError, ReqwestClient, WebhookNotifier, WebhookPayload, WebhookSender,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to start the async runtime.
    #[error("Failed to create Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The webhook could not be delivered.
    #[error("Webhook delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl RunError {
    /// Returns true when the failure stems from setup rather than the endpoint.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        match self {
            Self::Runtime(_) => false,
            Self::Delivery(e) => e.is_configuration(),
        }
    }
}

/// Runs one delivery on a fresh multi-threaded runtime.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created or delivery fails.
///
/// Excluded from coverage - performs real network I/O.
#[cfg(not(tarpaulin_include))]
pub fn run(config: &ValidatedConfig, args: SendArgs) -> Result<(), RunError> {
    let runtime = tokio::runtime::Runtime::new().map_err(RunError::Runtime)?;
    let notifier = create_notifier(config);

    runtime.block_on(send_notification(&notifier, &config.url, args.into()))
}

/// Creates the webhook notifier from configuration.
fn create_notifier(config: &ValidatedConfig) -> WebhookNotifier<ReqwestClient> {
    WebhookNotifier::new(ReqwestClient::new())
        .with_timeout(config.timeout)
        .with_retry_policy(config.retry_policy.clone())
}

/// Delivers `payload` and reports the outcome.
async fn send_notification<W: WebhookSender>(
    sender: &W,
    destination: &str,
    payload: WebhookPayload,
) -> Result<(), RunError> {
    tracing::debug!(
        secret_id = %payload.secret_id,
        delivery_manager = %payload.delivery_manager,
        "Sending webhook notification"
    );

    sender.deliver(payload, destination).await?;
    Ok(())
}
