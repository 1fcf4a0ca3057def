//! yopass-webhook: secret-sharing event notifier
//!
//! A library for delivering one-shot webhook notifications about shared
//! secrets, with bounded retries and a linear backoff between attempts.

pub mod config;
pub mod time;
pub mod webhook;
