//! Error types for webhook delivery.

use thiserror::Error;

/// Error type for a single HTTP exchange.
///
/// Describes what went wrong on the wire without dictating recovery strategy.
/// The delivery loop treats every variant as a transient failure.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the per-request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The client refused to build the request for this URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Why a single delivery attempt did not succeed.
///
/// Produced once per failed attempt. Only the last one survives the loop,
/// where it is folded into a [`DeliveryError`].
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The endpoint answered with a status outside 2xx.
    #[error("Non-success status {status}: {body}")]
    Status {
        /// HTTP status code returned
        status: http::StatusCode,
        /// Response body (lossy UTF-8, may be empty)
        body: String,
    },
}

impl AttemptError {
    /// Converts the last attempt's failure into the terminal error.
    #[must_use]
    pub fn into_delivery_error(self, attempts: u32) -> DeliveryError {
        match self {
            Self::Transport(source) => DeliveryError::Transport { attempts, source },
            Self::Status { status, body } => DeliveryError::Status {
                attempts,
                status,
                body,
            },
        }
    }
}

/// Terminal outcome of a failed delivery sequence.
///
/// `NotConfigured`, `InvalidDestination` and `Encoding` are returned before any
/// request is sent. The remaining variants are only returned once every
/// attempt has been used up.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// No destination URL was supplied.
    #[error("webhook URL not configured")]
    NotConfigured,

    /// The destination could not be turned into a request target.
    #[error("failed to create webhook request for '{url}': {reason}")]
    InvalidDestination {
        /// The rejected destination string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The payload could not be serialized.
    #[error("failed to marshal webhook payload: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Every attempt failed at the transport level.
    #[error("webhook failed after {attempts} attempts: {source}")]
    Transport {
        /// Number of attempts made
        attempts: u32,
        /// Error from the last attempt
        #[source]
        source: HttpError,
    },

    /// Every attempt failed and the last one returned a non-2xx status.
    #[error("webhook failed with status {} after {attempts} attempts: {body}", status.as_u16())]
    Status {
        /// Number of attempts made
        attempts: u32,
        /// Status code from the last attempt
        status: http::StatusCode,
        /// Response body from the last attempt
        body: String,
    },

    /// The loop ended without recording a failure.
    #[error("webhook failed after {attempts} attempts")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
    },
}

impl DeliveryError {
    /// Number of requests that were sent before giving up.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::NotConfigured | Self::InvalidDestination { .. } | Self::Encoding(_) => 0,
            Self::Transport { attempts, .. }
            | Self::Status { attempts, .. }
            | Self::Exhausted { attempts } => *attempts,
        }
    }

    /// Returns true for failures caused by setup rather than the remote endpoint.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured | Self::InvalidDestination { .. })
    }
}
