//! Webhook business logic: registry, matching, delivery, and dispatch.

pub mod delivery;
pub mod dispatcher;
pub mod event_publisher;
pub mod matcher;
pub mod registry;

pub use delivery::DeliveryExecutor;
pub use dispatcher::Dispatcher;
pub use event_publisher::{DomainEvent, EventPublisher};
pub use registry::WebhookRegistry;
