//! Append-only audit trail of webhook delivery outcomes.
//!
//! Every finished delivery (success or exhausted retries) produces one
//! [`DeliveryRecord`](crate::models::DeliveryRecord). The dispatcher appends
//! records asynchronously so a slow or failing sink never blocks delivery.

use async_trait::async_trait;

use crate::models::DeliveryRecord;

/// Error raised by an audit sink backend.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for delivery audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: DeliveryRecord) -> Result<(), AuditError>;
}

/// [`AuditSink`] that emits each record as a structured log line.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(&self, record: DeliveryRecord) -> Result<(), AuditError> {
        tracing::info!(
            target: "webhook_delivery",
            tenant_id = %record.tenant_id,
            webhook_id = %record.webhook_id,
            event_id = %record.event_id,
            event = %record.event,
            url = %record.url,
            status = ?record.status,
            http_status = ?record.http_status,
            attempts = record.attempts,
            "Webhook delivery recorded"
        );
        Ok(())
    }
}

/// [`AuditSink`] collecting records in memory, for tests and local setups.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: std::sync::Mutex<Vec<DeliveryRecord>>,
}

impl MemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records appended so far.
    #[must_use]
    pub fn records(&self) -> Vec<DeliveryRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, record: DeliveryRecord) -> Result<(), AuditError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| AuditError::Unavailable(e.to_string()))?;
        records.push(record);
        Ok(())
    }
}
