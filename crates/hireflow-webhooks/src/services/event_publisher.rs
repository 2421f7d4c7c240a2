//! In-process fan-in of domain events to the dispatch worker.
//!
//! Application code publishes [`DomainEvent`]s from wherever business logic
//! runs; the [`DispatchWorker`](crate::worker::DispatchWorker) subscribes and
//! turns each one into a webhook dispatch. Publishing never blocks and never
//! fails the caller: an event with no live subscriber is dropped with a
//! warning.

use hireflow_core::{TenantId, WebhookEventType};
use serde_json::Value;
use tokio::sync::broadcast;

/// A business event that may fan out to tenant webhooks.
#[derive(Debug, Clone)]
pub struct DomainEvent {
    pub tenant_id: TenantId,
    pub event_type: WebhookEventType,
    pub payload: Value,
}

impl DomainEvent {
    #[must_use]
    pub fn new(tenant_id: TenantId, event_type: WebhookEventType, payload: Value) -> Self {
        Self {
            tenant_id,
            event_type,
            payload,
        }
    }
}

/// Broadcast handle for publishing domain events.
#[derive(Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventPublisher {
    /// Create a publisher and the initial receiver for the dispatch worker.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<DomainEvent>) {
        let (sender, receiver) = broadcast::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Publish an event. Fire and forget.
    pub fn publish(&self, event: DomainEvent) {
        if self.sender.send(event).is_err() {
            tracing::warn!("No active webhook subscribers to receive event");
        }
    }

    /// Subscribe an additional receiver.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}
