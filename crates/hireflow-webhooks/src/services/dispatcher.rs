//! Event dispatch: fan-out of one event to every matching webhook.
//!
//! Each matching endpoint gets its own delivery task, so a slow or failing
//! endpoint never delays the others. All endpoints receive the same envelope
//! (one event id per dispatch), and every endpoint's terminal outcome is
//! appended to the audit trail without blocking the dispatch itself.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use hireflow_core::{EventId, TenantId, WebhookEventType, WebhookId};
use serde_json::{json, Value};

use crate::audit::AuditSink;
use crate::error::{ApiResult, WebhookError};
use crate::models::{
    DeliveryRecord, DeliveryStatus, DispatchSummary, TestDeliveryResponse, WebhookConfig,
    WebhookEnvelope,
};
use crate::services::delivery::{DeliveryExecutor, DeliveryOutcome};
use crate::services::matcher;
use crate::services::registry::WebhookRegistry;

/// Fans out domain events to subscribed webhooks.
pub struct Dispatcher {
    registry: Arc<WebhookRegistry>,
    executor: Arc<DeliveryExecutor>,
    audit: Arc<dyn AuditSink>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        registry: Arc<WebhookRegistry>,
        executor: Arc<DeliveryExecutor>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            registry,
            executor,
            audit,
        }
    }

    /// Deliver an event to every active, subscribed webhook of the tenant.
    ///
    /// Returns once every endpoint has reached a terminal outcome:
    /// `triggered` counts accepted deliveries, `failed` counts endpoints
    /// that exhausted their attempt budget.
    pub async fn dispatch(
        &self,
        tenant_id: TenantId,
        event_type: WebhookEventType,
        payload: Value,
    ) -> Result<DispatchSummary, WebhookError> {
        let configs = self.registry.dispatchable_configs(tenant_id).await?;
        let selected = matcher::select(configs, event_type);
        if selected.is_empty() {
            tracing::debug!(
                target: "webhook_delivery",
                tenant_id = %tenant_id,
                event = %event_type,
                "No webhooks subscribed to event"
            );
            return Ok(DispatchSummary::default());
        }

        let now = Utc::now();
        let webhook_ids: Vec<WebhookId> = selected.iter().map(|c| c.id.clone()).collect();
        // Stamped up front: "last told to fire", not "last answered".
        if let Err(e) = self
            .registry
            .touch_last_triggered(tenant_id, &webhook_ids, now)
            .await
        {
            tracing::warn!(
                target: "webhook_delivery",
                tenant_id = %tenant_id,
                error = %e,
                "Failed to stamp last_triggered_at before dispatch"
            );
        }

        let envelope = Arc::new(WebhookEnvelope {
            id: EventId::generate(),
            event: event_type,
            timestamp: now.timestamp(),
            data: payload,
        });

        tracing::info!(
            target: "webhook_delivery",
            tenant_id = %tenant_id,
            event = %event_type,
            event_id = %envelope.id,
            webhook_count = selected.len(),
            "Dispatching webhook event"
        );

        let mut handles = Vec::with_capacity(selected.len());
        for config in selected {
            let executor = Arc::clone(&self.executor);
            let envelope = Arc::clone(&envelope);
            handles.push(tokio::spawn(async move {
                let outcome = executor.deliver(&config, &envelope).await;
                (config, outcome)
            }));
        }

        let mut summary = DispatchSummary::default();
        for result in join_all(handles).await {
            match result {
                Ok((config, outcome)) => {
                    match outcome.status {
                        DeliveryStatus::Succeeded => summary.triggered += 1,
                        DeliveryStatus::Failed => summary.failed += 1,
                    }
                    self.record_outcome(&envelope, config, outcome);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        target: "webhook_delivery",
                        tenant_id = %tenant_id,
                        error = %e,
                        "Webhook delivery task panicked"
                    );
                }
            }
        }

        Ok(summary)
    }

    /// Send a `test.ping` delivery to one webhook, one attempt, no retries.
    ///
    /// Works on inactive configs too. Test pings are not audited and do not
    /// stamp `last_triggered_at`.
    pub async fn send_test(
        &self,
        tenant_id: TenantId,
        webhook_id: &WebhookId,
    ) -> ApiResult<TestDeliveryResponse> {
        let config = self.registry.find_config(tenant_id, webhook_id).await?;
        let envelope = WebhookEnvelope {
            id: EventId::generate(),
            event: WebhookEventType::TestPing,
            timestamp: Utc::now().timestamp(),
            data: json!({
                "message": "This is a test webhook delivery from hireflow"
            }),
        };

        let outcome = self.executor.deliver_once(&config, &envelope).await;
        Ok(TestDeliveryResponse {
            success: outcome.status == DeliveryStatus::Succeeded,
            http_status: outcome.http_status,
            error: outcome.error,
            attempts: outcome.attempts,
        })
    }

    /// Append the outcome to the audit trail without blocking dispatch.
    fn record_outcome(
        &self,
        envelope: &WebhookEnvelope,
        config: WebhookConfig,
        outcome: DeliveryOutcome,
    ) {
        let record = DeliveryRecord {
            tenant_id: config.tenant_id,
            webhook_id: config.id,
            event_id: envelope.id.clone(),
            event: envelope.event,
            url: config.url,
            status: outcome.status,
            http_status: outcome.http_status,
            error: outcome.error,
            attempts: outcome.attempts,
            recorded_at: Utc::now(),
        };
        let audit = Arc::clone(&self.audit);
        tokio::spawn(async move {
            if let Err(e) = audit.append(record).await {
                tracing::error!(
                    target: "webhook_delivery",
                    error = %e,
                    "Failed to append delivery audit record"
                );
            }
        });
    }
}
