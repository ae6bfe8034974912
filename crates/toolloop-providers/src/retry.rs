//! Caller-side retry around a model gateway.
//!
//! The orchestration loop treats every gateway failure as fatal to the run.
//! Drivers that want resilience wrap their gateway in `RetryingGateway`,
//! which retries `Unavailable` and `RateLimited` with capped exponential
//! backoff and passes every other error straight through.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use toolloop_core::config::RetryConfig;
use toolloop_core::types::{LlmResponse, Message, ToolDefinition};
use toolloop_core::GatewayError;

use crate::traits::ModelGateway;

/// Attempt count and backoff bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per call (values below 1 are treated as 1).
    pub max_attempts: u32,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Cap for any single backoff.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (1-based): `initial * 2^(retry-1)`, capped.
    pub fn backoff(&self, retry: u32) -> Duration {
        let cap = self.max_backoff.max(self.initial_backoff);
        let shift = retry.saturating_sub(1).min(20);
        self.initial_backoff
            .checked_mul(1u32 << shift)
            .unwrap_or(cap)
            .min(cap)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Decorates a gateway with retries on transient failures.
pub struct RetryingGateway<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: ModelGateway> RetryingGateway<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: ModelGateway> ModelGateway for RetryingGateway<G> {
    async fn send(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse, GatewayError> {
        let attempts = self.policy.attempts();
        let mut attempt = 1;
        loop {
            match self.inner.send(messages, tools).await {
                Err(e) if e.is_retryable() && attempt < attempts => {
                    let wait = self.policy.backoff(attempt);
                    warn!(
                        gateway = self.inner.display_name(),
                        attempt = attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "retrying model gateway call"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn display_name(&self) -> &str {
        self.inner.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Gateway that replays a fixed sequence of outcomes and counts calls.
    struct FlakyGateway {
        outcomes: Mutex<Vec<Result<LlmResponse, GatewayError>>>,
        calls: Mutex<u32>,
    }

    impl FlakyGateway {
        fn new(outcomes: Vec<Result<LlmResponse, GatewayError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ModelGateway for FlakyGateway {
        async fn send(
            &self,
            _messages: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<LlmResponse, GatewayError> {
            *self.calls.lock().unwrap() += 1;
            self.outcomes.lock().unwrap().remove(0)
        }

        fn model(&self) -> &str {
            "flaky"
        }

        fn display_name(&self) -> &str {
            "Flaky"
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_millis(2_000),
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(250));
        assert_eq!(policy.backoff(2), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(4), Duration::from_millis(2_000));
        assert_eq!(policy.backoff(10), Duration::from_millis(2_000));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from(&RetryConfig::default());
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.initial_backoff, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_retries_rate_limit_then_succeeds() {
        let gateway = RetryingGateway::new(
            FlakyGateway::new(vec![
                Err(GatewayError::RateLimited("429".into())),
                Ok(LlmResponse::text("done")),
            ]),
            fast_policy(3),
        );

        let resp = gateway.send(&[Message::user("hi")], &[]).await.unwrap();
        assert_eq!(resp.content.as_deref(), Some("done"));
        assert_eq!(gateway.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let gateway = RetryingGateway::new(
            FlakyGateway::new(vec![
                Err(GatewayError::Unavailable("down".into())),
                Err(GatewayError::Unavailable("still down".into())),
            ]),
            fast_policy(2),
        );

        let err = gateway.send(&[Message::user("hi")], &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(ref m) if m == "still down"));
        assert_eq!(gateway.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_passes_through() {
        let gateway = RetryingGateway::new(
            FlakyGateway::new(vec![Err(GatewayError::Api {
                status: 401,
                body: "bad key".into(),
            })]),
            fast_policy(5),
        );

        let err = gateway.send(&[Message::user("hi")], &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::Api { status: 401, .. }));
        assert_eq!(gateway.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_delegates_identity() {
        let gateway = RetryingGateway::new(FlakyGateway::new(vec![]), fast_policy(1));
        assert_eq!(gateway.model(), "flaky");
        assert_eq!(gateway.display_name(), "Flaky");
    }
}
