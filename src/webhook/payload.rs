//! Payload describing a secret-sharing event.

use serde::{Deserialize, Serialize};

/// Notification body sent to the webhook endpoint.
///
/// Serialized as a flat JSON object whose keys match the field names.
/// The record is built by the caller, handed to the sender by value and
/// encoded exactly once per delivery sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Link the recipient opens to read the secret once
    pub one_time_link: String,
    /// Identifier of the delivery manager handling the secret
    pub delivery_manager: String,
    /// When the secret was created
    pub timestamp: String,
    /// Lifetime of the secret in seconds
    pub expiration_seconds: i32,
    /// Address of the client that created the secret
    pub client_ip: String,
    /// Identifier of the stored secret
    pub secret_id: String,
}

impl WebhookPayload {
    /// Encodes the payload as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
