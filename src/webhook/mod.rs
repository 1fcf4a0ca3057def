//! Webhook layer for notifying external services about shared secrets.
//!
//! This module provides types and traits for:
//! - The notification body ([`WebhookPayload`])
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Delivery with retries ([`WebhookSender`], [`WebhookNotifier`])
//! - Retry policy configuration ([`RetryPolicy`])
//! - Background delivery for request handlers ([`spawn_delivery`])

mod background;
mod client;
mod error;
mod http;
mod payload;
mod retry;
mod sender;

#[cfg(test)]
mod sender_tests;

pub use background::spawn_delivery;
pub use client::ReqwestClient;
pub use error::{AttemptError, DeliveryError, HttpError};
pub use self::http::{HttpClient, HttpRequest, HttpResponse};
pub use payload::WebhookPayload;
pub use retry::RetryPolicy;
pub use sender::{DEFAULT_TIMEOUT, USER_AGENT, WebhookNotifier, WebhookSender};
