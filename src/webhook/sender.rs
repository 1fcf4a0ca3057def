//! Webhook sender trait and the HTTP delivery loop.

use std::time::Duration;

use http::HeaderValue;
use http::header::{CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};

use crate::time::{Sleeper, TokioSleeper};

use super::{
    AttemptError, DeliveryError, HttpClient, HttpRequest, RetryPolicy, WebhookPayload,
};

/// `User-Agent` sent with every webhook request.
pub const USER_AGENT: &str = "yopass-webhook/1.0";

/// Wall-clock limit applied to each attempt on its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for notifying an external service about a shared secret.
///
/// This abstraction lets callers hold any notification mechanism and
/// enables testing with mocks.
///
/// # Implementation Notes
///
/// Implementations handle retries internally and only surface the
/// terminal outcome of a delivery sequence.
pub trait WebhookSender: Send + Sync {
    /// Delivers `payload` to `destination`.
    ///
    /// An empty `destination` means webhooks are disabled and yields
    /// [`DeliveryError::NotConfigured`] without any network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the payload cannot be sent or every
    /// attempt fails.
    fn deliver(
        &self,
        payload: WebhookPayload,
        destination: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}

/// HTTP webhook notifier with bounded, linearly backed-off retries.
///
/// Serializes the payload once, then POSTs the same bytes up to
/// `retry_policy.max_attempts` times. A 2xx status ends the sequence
/// immediately; any transport error or other status is logged and, unless
/// it was the last attempt, followed by a wait of `attempt × base_delay`.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper implementation for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use yopass_webhook::webhook::{ReqwestClient, WebhookNotifier, WebhookPayload, WebhookSender};
///
/// # async fn example() -> Result<(), yopass_webhook::webhook::DeliveryError> {
/// let notifier = WebhookNotifier::new(ReqwestClient::new());
/// let payload = WebhookPayload {
///     one_time_link: "https://yopass.se/#/s/abc/key".to_string(),
///     delivery_manager: "mgr1".to_string(),
///     timestamp: "2024-01-01T00:00:00Z".to_string(),
///     expiration_seconds: 3600,
///     client_ip: "1.2.3.4".to_string(),
///     secret_id: "abc".to_string(),
/// };
/// notifier.deliver(payload, "https://hooks.example.com/yopass").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WebhookNotifier<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    retry_policy: RetryPolicy,
    timeout: Duration,
}

impl<H> WebhookNotifier<H, TokioSleeper> {
    /// Creates a notifier with the default retry policy, a 30 second
    /// per-attempt timeout and [`TokioSleeper`] for delays.
    #[must_use]
    pub const fn new(client: H) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            retry_policy: RetryPolicy::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl<H, S> WebhookNotifier<H, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> WebhookNotifier<H, S2> {
        WebhookNotifier {
            client: self.client,
            sleeper,
            retry_policy: self.retry_policy,
            timeout: self.timeout,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<H: HttpClient, S: Sleeper> WebhookNotifier<H, S> {
    /// Validates the destination and encodes the payload into the request
    /// reused by every attempt.
    fn build_request(
        &self,
        payload: &WebhookPayload,
        destination: &str,
    ) -> Result<HttpRequest, DeliveryError> {
        if destination.is_empty() {
            return Err(DeliveryError::NotConfigured);
        }

        let url = url::Url::parse(destination).map_err(|e| DeliveryError::InvalidDestination {
            url: destination.to_string(),
            reason: e.to_string(),
        })?;

        let body = payload.to_json()?;

        Ok(HttpRequest::post(url)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_header(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT))
            .with_body(body)
            .with_timeout(self.timeout))
    }

    /// Executes a single attempt, returning the 2xx status on success.
    async fn execute_request(
        &self,
        request: &HttpRequest,
    ) -> Result<http::StatusCode, AttemptError> {
        let response = self.client.request(request.clone()).await?;

        if response.is_success() {
            return Ok(response.status);
        }

        Err(AttemptError::Status {
            status: response.status,
            body: response.body_text().into_owned(),
        })
    }

    /// Runs the attempt loop.
    async fn deliver_with_retry(
        &self,
        payload: &WebhookPayload,
        destination: &str,
    ) -> Result<(), DeliveryError> {
        let request = self.build_request(payload, destination)?;
        let max_attempts = self.retry_policy.max_attempts;

        for attempt in 1..=max_attempts {
            match self.execute_request(&request).await {
                Ok(status) => {
                    tracing::info!(
                        attempt,
                        status_code = status.as_u16(),
                        delivery_manager = %payload.delivery_manager,
                        secret_id = %payload.secret_id,
                        "Webhook delivered successfully"
                    );
                    return Ok(());
                }
                Err(e) => {
                    log_attempt_failure(&e, attempt, destination);

                    if !self.retry_policy.should_retry(attempt) {
                        return Err(e.into_delivery_error(max_attempts));
                    }

                    let delay = self.retry_policy.delay_for_attempt(attempt);
                    tracing::debug!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying webhook after backoff"
                    );
                    self.sleeper.sleep(delay).await;
                }
            }
        }

        // Only reachable when the policy allows zero attempts.
        Err(DeliveryError::Exhausted {
            attempts: max_attempts,
        })
    }
}

impl<H: HttpClient, S: Sleeper> WebhookSender for WebhookNotifier<H, S> {
    async fn deliver(&self, payload: WebhookPayload, destination: &str) -> Result<(), DeliveryError> {
        self.deliver_with_retry(&payload, destination).await
    }
}

fn log_attempt_failure(error: &AttemptError, attempt: u32, destination: &str) {
    match error {
        AttemptError::Transport(e) => {
            tracing::warn!(
                attempt,
                error = %e,
                webhook_url = destination,
                "Webhook request failed"
            );
        }
        AttemptError::Status { status, body } => {
            tracing::warn!(
                attempt,
                status_code = status.as_u16(),
                response_body = %body,
                webhook_url = destination,
                "Webhook returned error status"
            );
        }
    }
}
