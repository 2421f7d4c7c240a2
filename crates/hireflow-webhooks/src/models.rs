//! Domain model and API types for webhook configurations and deliveries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use hireflow_core::{EventId, TenantId, WebhookEventType, WebhookId};

/// Schema version written into every new webhook configuration.
///
/// Loading skips configs with a higher version (written by newer code)
/// instead of misreading them; they stay in the store untouched.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Default number of delivery attempts per dispatch.
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Upper bound on the per-config retry count.
pub const MAX_RETRY_COUNT: u32 = 10;

// ---------------------------------------------------------------------------
// Wire contract
// ---------------------------------------------------------------------------

/// Header carrying the HMAC signature of the request body.
///
/// Reserved: custom headers may override any other standard header, but
/// never this one.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Header carrying the Unix timestamp the signature covers.
pub const TIMESTAMP_HEADER: &str = "X-Webhook-Timestamp";

/// Header naming the event type that produced the delivery.
pub const EVENT_HEADER: &str = "X-Webhook-Event";

/// JSON body delivered to webhook endpoints.
///
/// Serialized exactly once per delivery; the same bytes are signed and
/// sent so receivers can verify the signature against the raw body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    pub id: EventId,
    pub event: WebhookEventType,
    /// Unix epoch seconds at dispatch time.
    pub timestamp: i64,
    pub data: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Webhook configuration
// ---------------------------------------------------------------------------

/// A tenant's webhook endpoint configuration, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub schema_version: u32,
    pub id: WebhookId,
    pub tenant_id: TenantId,
    /// Human-readable label chosen by the tenant.
    pub name: String,
    pub url: String,
    /// Signing secret. Returned to callers only on create and regenerate.
    pub secret: String,
    pub events: Vec<WebhookEventType>,
    pub is_active: bool,
    pub retry_count: u32,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl WebhookConfig {
    /// Whether this config was written by a schema this code understands.
    #[must_use]
    pub fn has_supported_schema(&self) -> bool {
        self.schema_version <= CURRENT_SCHEMA_VERSION
    }
}

/// A webhook configuration with the signing secret redacted.
///
/// This is the only shape `get`, `list`, and `update` return; the type has
/// no secret field, so redaction cannot be skipped by accident.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfigView {
    #[schema(value_type = String, example = "wh_9f2e4c1a0b3d5e7f6a8c9b0d")]
    pub id: WebhookId,
    #[schema(value_type = uuid::Uuid)]
    pub tenant_id: TenantId,
    pub name: String,
    pub url: String,
    pub events: Vec<String>,
    pub is_active: bool,
    pub retry_count: u32,
    pub headers: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl From<WebhookConfig> for WebhookConfigView {
    fn from(config: WebhookConfig) -> Self {
        Self {
            id: config.id,
            tenant_id: config.tenant_id,
            name: config.name,
            url: config.url,
            events: config
                .events
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
            is_active: config.is_active,
            retry_count: config.retry_count,
            headers: config.headers,
            created_at: config.created_at,
            updated_at: config.updated_at,
            last_triggered_at: config.last_triggered_at,
        }
    }
}

/// Response for operations that reveal the signing secret (create,
/// regenerate).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookWithSecret {
    #[serde(flatten)]
    pub webhook: WebhookConfigView,
    pub secret: String,
}

// ---------------------------------------------------------------------------
// API requests and responses
// ---------------------------------------------------------------------------

/// Request body for registering a webhook.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    /// Event types to subscribe to; must be non-empty.
    pub events: Vec<String>,
    /// Extra headers sent with each delivery.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    /// Delivery attempts per dispatch (1-10). Defaults to 3.
    #[validate(range(min = 1, max = 10))]
    pub retry_count: Option<u32>,
}

/// Request body for partially updating a webhook. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,
    /// Replacement event subscriptions; must be non-empty when present.
    pub events: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub headers: Option<HashMap<String, String>>,
}

/// Response for `GET /webhooks`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookListResponse {
    pub items: Vec<WebhookConfigView>,
    pub total: usize,
}

/// Response for `POST /webhooks/{id}/test`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestDeliveryResponse {
    pub success: bool,
    pub http_status: Option<u16>,
    pub error: Option<String>,
    pub attempts: u32,
}

/// One entry of the event-type catalog.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeInfo {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
}

/// Response for `GET /webhooks/event-types`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeListResponse {
    pub event_types: Vec<EventTypeInfo>,
}

// ---------------------------------------------------------------------------
// Dispatch and audit records
// ---------------------------------------------------------------------------

/// Terminal status of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Succeeded,
    Failed,
}

/// Outcome counts for one dispatched event.
///
/// `triggered` counts endpoints whose delivery ultimately succeeded;
/// `failed` counts endpoints that exhausted their retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    pub triggered: u32,
    pub failed: u32,
}

/// Append-only audit record for one endpoint's delivery outcome.
///
/// Written after every dispatch fan-out; never read back by the
/// subsystem itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub tenant_id: TenantId,
    pub webhook_id: WebhookId,
    pub event_id: EventId,
    pub event: WebhookEventType,
    pub url: String,
    pub status: DeliveryStatus,
    pub http_status: Option<u16>,
    pub error: Option<String>,
    pub attempts: u32,
    pub recorded_at: DateTime<Utc>,
}
