//! Webhook delivery execution.
//!
//! One delivery pushes one event envelope to one endpoint, retrying
//! sequentially with exponential backoff until the endpoint accepts it or
//! the attempt budget runs out. The envelope is serialized exactly once;
//! every attempt signs and sends those same bytes, so the signature always
//! covers the body the receiver reads. Timestamp and signature headers are
//! computed fresh per attempt.

use std::time::{Duration, Instant};

use chrono::Utc;
use hireflow_core::WebhookEventType;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::crypto;
use crate::error::WebhookError;
use crate::models::{
    DeliveryStatus, WebhookConfig, WebhookEnvelope, EVENT_HEADER, SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
};

/// Per-request timeout for delivery attempts.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Unit for the doubling retry delay; the wait after attempt `n` is
/// `2^n` times this.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

const USER_AGENT: &str = "hireflow-webhooks/1.0";

// ---------------------------------------------------------------------------
// Delivery state machine
// ---------------------------------------------------------------------------

/// Result of a single HTTP attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptResult {
    Success {
        http_status: u16,
    },
    Failure {
        http_status: Option<u16>,
        error: String,
    },
}

/// Progress of one delivery through its attempt budget.
///
/// `Pending` begins attempt 1; each `Attempting` settles into `Succeeded`,
/// `Retrying`, or `Failed`; `Retrying` begins the next attempt after its
/// backoff delay. `Succeeded` and `Failed` are terminal. The last HTTP
/// status observed rides along so a terminal transport failure still
/// reports the status of an earlier rejected attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeliveryState {
    Pending,
    Attempting {
        /// Number of the attempt in flight, 1-based.
        attempt: u32,
        last_http_status: Option<u16>,
    },
    Retrying {
        /// Attempts completed so far.
        attempt: u32,
        last_http_status: Option<u16>,
    },
    Succeeded {
        attempts: u32,
        http_status: u16,
    },
    Failed {
        attempts: u32,
        http_status: Option<u16>,
        error: String,
    },
}

impl DeliveryState {
    /// Move into the next attempt. Terminal and in-flight states are
    /// returned unchanged.
    fn begin(self) -> Self {
        match self {
            Self::Pending => Self::Attempting {
                attempt: 1,
                last_http_status: None,
            },
            Self::Retrying {
                attempt,
                last_http_status,
            } => Self::Attempting {
                attempt: attempt + 1,
                last_http_status,
            },
            other => other,
        }
    }

    /// Fold the in-flight attempt's result into the state.
    fn settle(self, max_attempts: u32, result: &AttemptResult) -> Self {
        match self {
            Self::Attempting {
                attempt,
                last_http_status,
            } => match result {
                AttemptResult::Success { http_status } => Self::Succeeded {
                    attempts: attempt,
                    http_status: *http_status,
                },
                AttemptResult::Failure { http_status, error } => {
                    let observed = http_status.or(last_http_status);
                    if attempt >= max_attempts {
                        Self::Failed {
                            attempts: attempt,
                            http_status: observed,
                            error: error.clone(),
                        }
                    } else {
                        Self::Retrying {
                            attempt,
                            last_http_status: observed,
                        }
                    }
                }
            },
            other => other,
        }
    }

    fn outcome(self) -> Option<DeliveryOutcome> {
        match self {
            Self::Succeeded {
                attempts,
                http_status,
            } => Some(DeliveryOutcome {
                status: DeliveryStatus::Succeeded,
                http_status: Some(http_status),
                error: None,
                attempts,
            }),
            Self::Failed {
                attempts,
                http_status,
                error,
            } => Some(DeliveryOutcome {
                status: DeliveryStatus::Failed,
                http_status,
                error: Some(error),
                attempts,
            }),
            Self::Pending | Self::Attempting { .. } | Self::Retrying { .. } => None,
        }
    }
}

/// Terminal result of a delivery, after all attempts.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub status: DeliveryStatus,
    pub http_status: Option<u16>,
    pub error: Option<String>,
    pub attempts: u32,
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Executes webhook deliveries over HTTP.
pub struct DeliveryExecutor {
    http_client: reqwest::Client,
    request_timeout: Duration,
    backoff_base: Duration,
}

impl DeliveryExecutor {
    pub fn new() -> Result<Self, WebhookError> {
        Self::with_timeouts(DEFAULT_REQUEST_TIMEOUT, DEFAULT_BACKOFF_BASE)
    }

    /// Build an executor with explicit timing, for tests and tuned setups.
    pub fn with_timeouts(
        request_timeout: Duration,
        backoff_base: Duration,
    ) -> Result<Self, WebhookError> {
        // Redirects are not followed; a redirect response is a failed attempt.
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| WebhookError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http_client,
            request_timeout,
            backoff_base,
        })
    }

    /// Deliver an envelope using the config's full attempt budget.
    pub async fn deliver(
        &self,
        config: &WebhookConfig,
        envelope: &WebhookEnvelope,
    ) -> DeliveryOutcome {
        self.run(config, envelope, config.retry_count.max(1)).await
    }

    /// Deliver an envelope with a single attempt, no retries.
    pub async fn deliver_once(
        &self,
        config: &WebhookConfig,
        envelope: &WebhookEnvelope,
    ) -> DeliveryOutcome {
        self.run(config, envelope, 1).await
    }

    async fn run(
        &self,
        config: &WebhookConfig,
        envelope: &WebhookEnvelope,
        max_attempts: u32,
    ) -> DeliveryOutcome {
        // Serialize once so every attempt signs and sends identical bytes.
        let body = match serde_json::to_vec(envelope) {
            Ok(body) => body,
            Err(e) => {
                return DeliveryOutcome {
                    status: DeliveryStatus::Failed,
                    http_status: None,
                    error: Some(format!("Failed to serialize payload: {e}")),
                    attempts: 0,
                };
            }
        };

        let mut state = DeliveryState::Pending.begin();
        loop {
            state = match state {
                DeliveryState::Attempting {
                    attempt,
                    last_http_status,
                } => {
                    let result = self.attempt(config, envelope.event, &body, attempt).await;
                    DeliveryState::Attempting {
                        attempt,
                        last_http_status,
                    }
                    .settle(max_attempts, &result)
                }
                DeliveryState::Retrying {
                    attempt,
                    last_http_status,
                } => {
                    tokio::time::sleep(self.backoff_delay(attempt)).await;
                    DeliveryState::Retrying {
                        attempt,
                        last_http_status,
                    }
                    .begin()
                }
                terminal => {
                    break terminal.outcome().unwrap_or_else(|| DeliveryOutcome {
                        status: DeliveryStatus::Failed,
                        http_status: None,
                        error: Some("Delivery ended without a terminal state".to_string()),
                        attempts: 0,
                    });
                }
            };
        }
    }

    async fn attempt(
        &self,
        config: &WebhookConfig,
        event: WebhookEventType,
        body: &[u8],
        attempt: u32,
    ) -> AttemptResult {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = crypto::sign_payload(&config.secret, &timestamp, body);

        let mut headers = HeaderMap::new();
        if let Ok(v) = "application/json".parse() {
            headers.insert(CONTENT_TYPE, v);
        }
        if let Ok(v) = timestamp.parse() {
            headers.insert(TIMESTAMP_HEADER, v);
        }
        if let Ok(v) = event.as_str().parse() {
            headers.insert(EVENT_HEADER, v);
        }
        // Custom headers may override anything except the signature, which
        // goes in last.
        for (name, value) in &config.headers {
            if name.eq_ignore_ascii_case(SIGNATURE_HEADER) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }
        if let Ok(v) = signature.parse() {
            headers.insert(SIGNATURE_HEADER, v);
        }

        let started = Instant::now();
        let response = self
            .http_client
            .post(&config.url)
            .headers(headers)
            .body(body.to_vec())
            .send()
            .await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match response {
            Ok(response) => {
                let status = response.status().as_u16();
                if response.status().is_success() {
                    tracing::info!(
                        target: "webhook_delivery",
                        webhook_id = %config.id,
                        event = %event,
                        attempt,
                        http_status = status,
                        latency_ms,
                        "Webhook delivered"
                    );
                    AttemptResult::Success {
                        http_status: status,
                    }
                } else {
                    tracing::warn!(
                        target: "webhook_delivery",
                        webhook_id = %config.id,
                        event = %event,
                        attempt,
                        http_status = status,
                        latency_ms,
                        "Webhook delivery attempt rejected"
                    );
                    AttemptResult::Failure {
                        http_status: Some(status),
                        error: format!("HTTP {status}"),
                    }
                }
            }
            Err(e) => {
                let error = if e.is_timeout() {
                    format!("Request timed out after {:?}", self.request_timeout)
                } else if e.is_connect() {
                    format!("Connection error: {e}")
                } else {
                    format!("Request error: {e}")
                };
                tracing::warn!(
                    target: "webhook_delivery",
                    webhook_id = %config.id,
                    event = %event,
                    attempt,
                    latency_ms,
                    error = %error,
                    "Webhook delivery attempt failed"
                );
                AttemptResult::Failure {
                    http_status: None,
                    error,
                }
            }
        }
    }

    /// Delay to sleep after `completed_attempt` failed attempts.
    ///
    /// `base * 2^attempt`: 2x after the first attempt, 4x after the second,
    /// and so on. The exponent is capped so the shift cannot overflow even
    /// with an out-of-range retry budget.
    fn backoff_delay(&self, completed_attempt: u32) -> Duration {
        let exponent = completed_attempt.min(10);
        self.backoff_base * (1u32 << exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> AttemptResult {
        AttemptResult::Success { http_status: 200 }
    }

    fn failure(http_status: Option<u16>) -> AttemptResult {
        AttemptResult::Failure {
            http_status,
            error: "boom".to_string(),
        }
    }

    fn attempting(attempt: u32) -> DeliveryState {
        DeliveryState::Attempting {
            attempt,
            last_http_status: None,
        }
    }

    #[test]
    fn test_pending_begins_first_attempt() {
        assert_eq!(DeliveryState::Pending.begin(), attempting(1));
    }

    #[test]
    fn test_retrying_begins_next_attempt() {
        let retrying = DeliveryState::Retrying {
            attempt: 2,
            last_http_status: Some(500),
        };
        assert_eq!(
            retrying.begin(),
            DeliveryState::Attempting {
                attempt: 3,
                last_http_status: Some(500),
            }
        );
    }

    #[test]
    fn test_begin_leaves_terminal_states_alone() {
        let done = DeliveryState::Succeeded {
            attempts: 1,
            http_status: 200,
        };
        assert_eq!(done.clone().begin(), done);
    }

    #[test]
    fn test_success_settles_terminal() {
        let state = attempting(1).settle(3, &success());
        assert_eq!(
            state,
            DeliveryState::Succeeded {
                attempts: 1,
                http_status: 200
            }
        );
    }

    #[test]
    fn test_failure_with_budget_left_retries() {
        let state = attempting(1).settle(3, &failure(Some(500)));
        assert_eq!(
            state,
            DeliveryState::Retrying {
                attempt: 1,
                last_http_status: Some(500),
            }
        );
    }

    #[test]
    fn test_failure_on_last_attempt_is_terminal() {
        let state = attempting(3).settle(3, &failure(Some(503)));
        let outcome = state.outcome().unwrap();
        assert_eq!(outcome.status, DeliveryStatus::Failed);
        assert_eq!(outcome.http_status, Some(503));
        assert_eq!(outcome.attempts, 3);
    }

    #[test]
    fn test_single_attempt_budget_never_retries() {
        let state = attempting(1).settle(1, &failure(None));
        assert_eq!(state.clone().begin(), state);
        assert_eq!(state.outcome().unwrap().attempts, 1);
    }

    #[test]
    fn test_success_on_retry_reports_total_attempts() {
        let outcome = attempting(2).settle(3, &success()).outcome().unwrap();
        assert_eq!(outcome.status, DeliveryStatus::Succeeded);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn test_terminal_transport_failure_keeps_last_seen_status() {
        // A 500 on the first attempt, then a connection-level failure on the
        // last one: the outcome still reports the 500.
        let outcome = attempting(1)
            .settle(2, &failure(Some(500)))
            .begin()
            .settle(2, &failure(None))
            .outcome()
            .unwrap();
        assert_eq!(outcome.status, DeliveryStatus::Failed);
        assert_eq!(outcome.http_status, Some(500));
        assert_eq!(outcome.error.as_deref(), Some("boom"));
        assert_eq!(outcome.attempts, 2);
    }

    #[test]
    fn test_non_terminal_states_have_no_outcome() {
        assert!(DeliveryState::Pending.outcome().is_none());
        assert!(attempting(1).outcome().is_none());
        assert!(DeliveryState::Retrying {
            attempt: 1,
            last_http_status: None,
        }
        .outcome()
        .is_none());
    }

    #[tokio::test]
    async fn test_backoff_schedule_doubles() {
        let executor =
            DeliveryExecutor::with_timeouts(Duration::from_secs(1), Duration::from_millis(100))
                .unwrap();
        assert_eq!(executor.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(executor.backoff_delay(2), Duration::from_millis(400));
        assert_eq!(executor.backoff_delay(3), Duration::from_millis(800));
        assert_eq!(executor.backoff_delay(4), Duration::from_millis(1600));
    }

    #[tokio::test]
    async fn test_backoff_exponent_is_capped() {
        let executor =
            DeliveryExecutor::with_timeouts(Duration::from_secs(1), Duration::from_millis(1))
                .unwrap();
        assert_eq!(executor.backoff_delay(50), Duration::from_millis(1024));
    }
}
