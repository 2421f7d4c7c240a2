//! Background worker turning published domain events into webhook dispatches.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::services::dispatcher::Dispatcher;
use crate::services::event_publisher::DomainEvent;

/// Consumes domain events and dispatches them until shutdown.
///
/// Dispatches run inline, one event at a time; the per-event fan-out is
/// already concurrent. If the worker falls behind the broadcast channel's
/// capacity, lagged events are dropped and counted in a warning.
pub struct DispatchWorker {
    dispatcher: Arc<Dispatcher>,
    events: broadcast::Receiver<DomainEvent>,
    shutdown: CancellationToken,
}

impl DispatchWorker {
    #[must_use]
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        events: broadcast::Receiver<DomainEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            dispatcher,
            events,
            shutdown,
        }
    }

    /// Run until the shutdown token fires or the event channel closes.
    pub async fn run(mut self) {
        tracing::info!("Webhook dispatch worker started");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    tracing::info!("Webhook dispatch worker shutting down");
                    break;
                }
                result = self.events.recv() => match result {
                    Ok(event) => self.handle_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Webhook dispatch worker lagged; events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event channel closed; webhook dispatch worker stopping");
                        break;
                    }
                },
            }
        }
    }

    async fn handle_event(&self, event: DomainEvent) {
        let DomainEvent {
            tenant_id,
            event_type,
            payload,
        } = event;

        match self.dispatcher.dispatch(tenant_id, event_type, payload).await {
            Ok(summary) => {
                tracing::debug!(
                    target: "webhook_delivery",
                    tenant_id = %tenant_id,
                    event = %event_type,
                    triggered = summary.triggered,
                    failed = summary.failed,
                    "Webhook dispatch finished"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: "webhook_delivery",
                    tenant_id = %tenant_id,
                    event = %event_type,
                    error = %e,
                    "Webhook dispatch failed"
                );
            }
        }
    }
}
