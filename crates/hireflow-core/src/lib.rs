//! hireflow Core Library
//!
//! Shared types for hireflow services.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (TenantId, WebhookId, EventId)
//! - [`events`] - The hiring-domain webhook event catalog
//! - [`tenant`] - Request-scoped tenant identity

pub mod events;
pub mod ids;
pub mod tenant;

// Flatten the public surface; callers import from the crate root
pub use events::WebhookEventType;
pub use ids::{EventId, ParseIdError, TenantId, WebhookId};
pub use tenant::TenantContext;
