//! Tests for `WebhookSender` and `WebhookNotifier`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{
    DEFAULT_TIMEOUT, DeliveryError, HttpClient, HttpError, HttpRequest, HttpResponse,
    RetryPolicy, USER_AGENT, WebhookNotifier, WebhookPayload, WebhookSender,
};
use crate::time::{InstantSleeper, Sleeper};

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn statuses(codes: &[u16]) -> Self {
        Self::new(
            codes
                .iter()
                .map(|&code| {
                    let status = http::StatusCode::from_u16(code).unwrap();
                    Ok(HttpResponse::with_status(status, format!("status {code}")))
                })
                .collect(),
        )
    }

    fn success() -> Self {
        Self::statuses(&[200])
    }

    fn always_refused() -> Self {
        Self::new(
            (0..3)
                .map(|_| {
                    Err(HttpError::Connection(Box::new(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "connection refused",
                    ))))
                })
                .collect(),
        )
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("more requests than scripted responses")
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

/// Sleeper that records requested delays and returns at once.
#[derive(Debug, Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for Arc<RecordingSleeper> {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

const DESTINATION: &str = "https://hooks.example.com/yopass";

fn payload() -> WebhookPayload {
    WebhookPayload {
        one_time_link: "abc".to_string(),
        delivery_manager: "mgr1".to_string(),
        timestamp: "2024-01-01T00:00:00Z".to_string(),
        expiration_seconds: 3600,
        client_ip: "1.2.3.4".to_string(),
        secret_id: "sec-1".to_string(),
    }
}

/// Builds a notifier over a shared mock client and a recording sleeper.
fn harness(
    client: MockClient,
) -> (
    WebhookNotifier<Arc<MockClient>, Arc<RecordingSleeper>>,
    Arc<MockClient>,
    Arc<RecordingSleeper>,
) {
    let client = Arc::new(client);
    let sleeper = Arc::new(RecordingSleeper::default());
    let notifier = WebhookNotifier::new(client.clone()).with_sleeper(sleeper.clone());
    (notifier, client, sleeper)
}

mod builder {
    use super::*;

    #[test]
    fn new_uses_default_policy_and_timeout() {
        let notifier = WebhookNotifier::new(MockClient::success());

        assert_eq!(*notifier.retry_policy(), RetryPolicy::default());
        assert_eq!(notifier.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn with_retry_policy_sets_policy() {
        let notifier = WebhookNotifier::new(MockClient::success())
            .with_retry_policy(RetryPolicy::new().with_max_attempts(5));

        assert_eq!(notifier.retry_policy().max_attempts, 5);
    }

    #[test]
    fn with_timeout_sets_timeout() {
        let notifier =
            WebhookNotifier::new(MockClient::success()).with_timeout(Duration::from_secs(5));

        assert_eq!(notifier.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn with_sleeper_keeps_other_settings() {
        let notifier = WebhookNotifier::new(MockClient::success())
            .with_timeout(Duration::from_secs(7))
            .with_retry_policy(RetryPolicy::new().with_max_attempts(2))
            .with_sleeper(InstantSleeper);

        assert_eq!(notifier.timeout(), Duration::from_secs(7));
        assert_eq!(notifier.retry_policy().max_attempts, 2);
    }
}

mod request_shape {
    use super::*;

    #[tokio::test]
    async fn posts_to_destination_with_fixed_headers() {
        let (notifier, client, _) = harness(MockClient::success());

        notifier.deliver(payload(), DESTINATION).await.unwrap();

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, http::Method::POST);
        assert_eq!(req.url.as_str(), DESTINATION);
        assert_eq!(
            req.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(req.headers.get(http::header::USER_AGENT).unwrap(), USER_AGENT);
        assert_eq!(USER_AGENT, "yopass-webhook/1.0");
    }

    #[tokio::test]
    async fn every_attempt_carries_its_own_timeout() {
        let (notifier, client, _) = harness(MockClient::statuses(&[503, 503, 200]));

        notifier.deliver(payload(), DESTINATION).await.unwrap();

        assert!(
            client
                .captured_requests()
                .iter()
                .all(|r| r.timeout == Some(Duration::from_secs(30)))
        );
    }

    #[tokio::test]
    async fn custom_timeout_is_forwarded() {
        let client = Arc::new(MockClient::success());
        let notifier = WebhookNotifier::new(client.clone())
            .with_sleeper(InstantSleeper)
            .with_timeout(Duration::from_secs(3));

        notifier.deliver(payload(), DESTINATION).await.unwrap();

        assert_eq!(
            client.captured_requests()[0].timeout,
            Some(Duration::from_secs(3))
        );
    }

    #[tokio::test]
    async fn body_is_the_json_payload() {
        let (notifier, client, _) = harness(MockClient::success());

        notifier.deliver(payload(), DESTINATION).await.unwrap();

        let body = client.captured_requests()[0].body.clone().unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"one_time_link":"abc","delivery_manager":"mgr1","timestamp":"2024-01-01T00:00:00Z","expiration_seconds":3600,"client_ip":"1.2.3.4","secret_id":"sec-1"}"#
        );
    }

    #[tokio::test]
    async fn body_is_identical_across_attempts() {
        let (notifier, client, _) = harness(MockClient::statuses(&[500, 500, 500]));

        let _ = notifier.deliver(payload(), DESTINATION).await;

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 3);
        let first = requests[0].body.clone().unwrap();
        assert!(requests.iter().all(|r| r.body.as_ref() == Some(&first)));
        assert_eq!(first, payload().to_json().unwrap());
    }
}

mod outcomes {
    use super::*;

    #[tokio::test]
    async fn first_success_stops_immediately() {
        let (notifier, client, sleeper) = harness(MockClient::success());

        let result = notifier.deliver(payload(), DESTINATION).await;

        assert!(result.is_ok());
        assert_eq!(client.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn any_2xx_counts_as_delivered() {
        for code in [201, 202, 204, 299] {
            let (notifier, client, _) = harness(MockClient::statuses(&[code]));

            assert!(notifier.deliver(payload(), DESTINATION).await.is_ok(), "{code}");
            assert_eq!(client.calls(), 1);
        }
    }

    #[tokio::test]
    async fn empty_body_on_success_is_fine() {
        let client = MockClient::new(vec![Ok(HttpResponse::with_status(
            http::StatusCode::OK,
            Vec::new(),
        ))]);
        let (notifier, _, _) = harness(client);

        assert!(notifier.deliver(payload(), DESTINATION).await.is_ok());
    }

    #[tokio::test]
    async fn recovers_on_third_attempt_with_linear_backoff() {
        let (notifier, client, sleeper) = harness(MockClient::statuses(&[500, 500, 200]));

        let result = notifier.deliver(payload(), DESTINATION).await;

        assert!(result.is_ok());
        assert_eq!(client.calls(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn recovers_after_transport_error() {
        let client = MockClient::new(vec![
            Err(HttpError::Timeout),
            Ok(HttpResponse::with_status(http::StatusCode::OK, "")),
        ]);
        let (notifier, client, sleeper) = harness(client);

        assert!(notifier.deliver(payload(), DESTINATION).await.is_ok());
        assert_eq!(client.calls(), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn client_errors_are_retried_too() {
        let (notifier, client, _) = harness(MockClient::statuses(&[404, 401, 200]));

        assert!(notifier.deliver(payload(), DESTINATION).await.is_ok());
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn persistent_status_failure_reports_last_response() {
        let (notifier, client, sleeper) = harness(MockClient::statuses(&[502, 503, 500]));

        let result = notifier.deliver(payload(), DESTINATION).await;

        match result {
            Err(DeliveryError::Status {
                attempts,
                status,
                body,
            }) => {
                assert_eq!(attempts, 3);
                assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "status 500");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
        assert_eq!(client.calls(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn persistent_transport_failure_wraps_last_error() {
        let (notifier, client, _) = harness(MockClient::always_refused());

        let result = notifier.deliver(payload(), DESTINATION).await;

        match result {
            Err(DeliveryError::Transport {
                attempts,
                source: HttpError::Connection(inner),
            }) => {
                assert_eq!(attempts, 3);
                assert!(inner.to_string().contains("connection refused"));
            }
            other => panic!("Expected Transport error, got {other:?}"),
        }
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn last_failure_kind_wins() {
        let client = MockClient::new(vec![
            Ok(HttpResponse::with_status(
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "",
            )),
            Ok(HttpResponse::with_status(
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "",
            )),
            Err(HttpError::Timeout),
        ]);
        let (notifier, _, _) = harness(client);

        let result = notifier.deliver(payload(), DESTINATION).await;

        assert!(matches!(
            result,
            Err(DeliveryError::Transport {
                attempts: 3,
                source: HttpError::Timeout
            })
        ));
    }

    #[tokio::test]
    async fn single_attempt_policy_never_sleeps() {
        let client = Arc::new(MockClient::statuses(&[500]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let notifier = WebhookNotifier::new(client.clone())
            .with_sleeper(sleeper.clone())
            .with_retry_policy(RetryPolicy::new().with_max_attempts(1));

        let result = notifier.deliver(payload(), DESTINATION).await;

        assert!(matches!(
            result,
            Err(DeliveryError::Status { attempts: 1, .. })
        ));
        assert_eq!(client.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn zero_attempt_policy_reports_exhausted() {
        let client = Arc::new(MockClient::success());
        let policy = RetryPolicy {
            max_attempts: 0,
            base_delay: Duration::from_secs(1),
        };
        let notifier = WebhookNotifier::new(client.clone())
            .with_sleeper(InstantSleeper)
            .with_retry_policy(policy);

        let result = notifier.deliver(payload(), DESTINATION).await;

        assert!(matches!(result, Err(DeliveryError::Exhausted { attempts: 0 })));
        assert_eq!(client.calls(), 0);
    }
}

mod preconditions {
    use super::*;

    #[tokio::test]
    async fn empty_destination_is_not_configured() {
        let (notifier, client, sleeper) = harness(MockClient::success());

        let result = notifier.deliver(payload(), "").await;

        assert!(matches!(result, Err(DeliveryError::NotConfigured)));
        assert_eq!(client.calls(), 0);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn unparsable_destination_fails_without_sending() {
        let (notifier, client, sleeper) = harness(MockClient::success());

        let result = notifier.deliver(payload(), "not a url").await;

        match result {
            Err(DeliveryError::InvalidDestination { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("Expected InvalidDestination, got {other:?}"),
        }
        assert_eq!(client.calls(), 0);
        assert!(sleeper.delays().is_empty());
    }
}

mod real_time {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn backoff_suspends_caller_for_one_then_two_seconds() {
        let client = Arc::new(MockClient::statuses(&[500, 500, 200]));
        let notifier = WebhookNotifier::new(client.clone());
        let start = tokio::time::Instant::now();

        notifier.deliver(payload(), DESTINATION).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_millis(3050));
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_does_not_wait() {
        let notifier = WebhookNotifier::new(MockClient::success());
        let start = tokio::time::Instant::now();

        notifier.deliver(payload(), DESTINATION).await.unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

mod traits {
    use super::*;

    #[test]
    fn notifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WebhookNotifier<MockClient>>();
        assert_send_sync::<WebhookNotifier<MockClient, InstantSleeper>>();
    }

    #[test]
    fn notifier_debug_is_readable() {
        let debug = format!("{:?}", WebhookNotifier::new(MockClient::success()));

        assert!(debug.contains("WebhookNotifier"));
        assert!(debug.contains("retry_policy"));
    }
}
