//! Common test utilities for hireflow-webhooks integration tests.
//!
//! Provides mock responders, fixtures, and a wired registry/dispatcher pair
//! for verifying webhook behavior against local mock servers.

// Each test binary compiles this module; not all of them use every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use wiremock::{Request, Respond, ResponseTemplate};

use hireflow_core::{TenantId, WebhookEventType, WebhookId};
use hireflow_webhooks::audit::{AuditError, AuditSink};
use hireflow_webhooks::models::{CreateWebhookRequest, DeliveryRecord, WebhookConfig, CURRENT_SCHEMA_VERSION};
use hireflow_webhooks::services::{DeliveryExecutor, Dispatcher, WebhookRegistry};
use hireflow_webhooks::store::InMemoryConfigStore;
use hireflow_webhooks::validation::UrlPolicy;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Standard test tenants.
pub fn tenant_a() -> TenantId {
    TenantId::from_uuid(Uuid::from_bytes([0x11; 16]))
}

pub fn tenant_b() -> TenantId {
    TenantId::from_uuid(Uuid::from_bytes([0x22; 16]))
}

pub const SECRET_1: &str = "whsec_test_secret_key_12345";

/// Delivery executor tuned for fast tests.
pub fn test_executor() -> DeliveryExecutor {
    DeliveryExecutor::with_timeouts(Duration::from_secs(2), Duration::from_millis(25))
        .expect("failed to build test executor")
}

/// Registry over a fresh in-memory store, accepting local mock server URLs.
pub fn test_registry() -> Arc<WebhookRegistry> {
    Arc::new(
        WebhookRegistry::new(Arc::new(InMemoryConfigStore::new()))
            .with_url_policy(UrlPolicy::permissive()),
    )
}

/// A registry and dispatcher sharing one store and executor.
pub fn test_harness(audit: Arc<dyn AuditSink>) -> (Arc<WebhookRegistry>, Arc<Dispatcher>) {
    let registry = test_registry();
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&registry),
        Arc::new(test_executor()),
        audit,
    ));
    (registry, dispatcher)
}

/// Request body for registering a webhook with default settings.
pub fn create_request(url: &str, events: &[&str]) -> CreateWebhookRequest {
    CreateWebhookRequest {
        name: "Test webhook".to_string(),
        url: url.to_string(),
        events: events.iter().map(|s| (*s).to_string()).collect(),
        headers: None,
        retry_count: None,
    }
}

/// A config built directly, bypassing the registry, for executor-level tests.
pub fn manual_config(
    tenant_id: TenantId,
    url: &str,
    secret: &str,
    events: Vec<WebhookEventType>,
    retry_count: u32,
) -> WebhookConfig {
    let now = Utc::now();
    WebhookConfig {
        schema_version: CURRENT_SCHEMA_VERSION,
        id: WebhookId::generate(),
        tenant_id,
        name: "Manual webhook".to_string(),
        url: url.to_string(),
        secret: secret.to_string(),
        events,
        is_active: true,
        retry_count,
        headers: HashMap::new(),
        created_at: now,
        updated_at: now,
        last_triggered_at: None,
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_for<F>(mut condition: F, timeout: Duration) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

// ---------------------------------------------------------------------------
// Inspecting what an endpoint received
// ---------------------------------------------------------------------------

/// Body and headers of one request as the mock endpoint saw them.
///
/// Header names are lowercased at capture time, so lookups are
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub body: Vec<u8>,
    headers: HashMap<String, String>,
}

impl CapturedRequest {
    fn from_wiremock(request: &Request) -> Self {
        Self {
            body: request.body.clone(),
            headers: request
                .headers
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_ascii_lowercase(),
                        v.to_str().unwrap_or("").to_string(),
                    )
                })
                .collect(),
        }
    }

    /// Deserialize the captured body.
    pub fn body_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Look up a header by name, any casing.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// The JSON envelope receivers get.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceivedEnvelope {
    pub id: String,
    pub event: String,
    pub timestamp: i64,
    pub data: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Mock endpoint responders
// ---------------------------------------------------------------------------

/// Answers 200 and keeps a copy of every request it sees.
#[derive(Clone, Default)]
pub struct CaptureResponder {
    seen: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl CaptureResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything captured so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Respond for CaptureResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.seen
            .lock()
            .unwrap()
            .push(CapturedRequest::from_wiremock(request));
        ResponseTemplate::new(200)
    }
}

/// Answers a fixed status and counts how often it was hit.
#[derive(Clone)]
pub struct CountingResponder {
    hits: Arc<AtomicUsize>,
    status: u16,
}

impl CountingResponder {
    pub fn new() -> Self {
        Self::with_status(200)
    }

    /// A counter that answers `status` instead of 200.
    pub fn with_status(status: u16) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            status,
        }
    }

    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Default for CountingResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl Respond for CountingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.hits.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(self.status)
    }
}

/// Answers 500 for the first `failures` requests, then 200.
#[derive(Clone)]
pub struct FailingResponder {
    hits: Arc<AtomicUsize>,
    failures: usize,
}

impl FailingResponder {
    pub fn fail_times(failures: usize) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            failures,
        }
    }

    pub fn attempt_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Respond for FailingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let nth = self.hits.fetch_add(1, Ordering::SeqCst) + 1;
        if nth <= self.failures {
            ResponseTemplate::new(500)
        } else {
            ResponseTemplate::new(200)
        }
    }
}

/// Answers 200 after sitting on the request for a while.
#[derive(Clone)]
pub struct DelayedResponder {
    delay: Duration,
}

impl DelayedResponder {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl Respond for DelayedResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_delay(self.delay)
    }
}

// ---------------------------------------------------------------------------
// FailingAuditSink - audit backend that always errors
// ---------------------------------------------------------------------------

/// An [`AuditSink`] whose appends always fail.
pub struct FailingAuditSink;

#[async_trait::async_trait]
impl AuditSink for FailingAuditSink {
    async fn append(&self, _record: DeliveryRecord) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("audit backend offline".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Recomputing signatures on the receiving side
// ---------------------------------------------------------------------------

/// Recompute the HMAC hex a correctly-signed delivery must carry.
pub fn compute_test_signature(secret: &str, timestamp: &str, body: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");

    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);

    hex::encode(mac.finalize().into_bytes())
}

/// Check a captured request's signature header against `secret`.
pub fn verify_captured_signature(request: &CapturedRequest, secret: &str) -> bool {
    let signature_header = match request.header("x-webhook-signature") {
        Some(h) => h,
        None => return false,
    };

    let timestamp = match request.header("x-webhook-timestamp") {
        Some(t) => t,
        None => return false,
    };

    // Expected format: "v1={hex}"
    let expected = format!(
        "v1={}",
        compute_test_signature(secret, timestamp, &request.body)
    );

    signature_header == expected
}
