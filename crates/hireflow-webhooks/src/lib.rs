//! Outbound webhook dispatch and delivery for hireflow.
//!
//! Provides tenant-scoped webhook configuration management, HMAC-SHA256
//! payload signing, concurrent fan-out of hiring-pipeline events to
//! subscribed endpoints with exponential backoff retries, and append-only
//! delivery auditing.

pub mod audit;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;
pub mod validation;
pub mod worker;

pub use error::{ApiResult, WebhookError};
pub use router::{webhooks_router, WebhooksState};
pub use services::event_publisher::{DomainEvent, EventPublisher};
pub use worker::DispatchWorker;
