//! HTTP surface of the webhook subsystem.
//!
//! The router is mounted by the host application under its API prefix.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::configs;
use crate::services::dispatcher::Dispatcher;
use crate::services::registry::WebhookRegistry;

/// Everything the webhook handlers need, cloned per request.
#[derive(Clone)]
pub struct WebhooksState {
    pub registry: Arc<WebhookRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}

impl WebhooksState {
    /// Bundle a registry and dispatcher into handler state.
    #[must_use]
    pub fn new(registry: Arc<WebhookRegistry>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }
}

/// Build the webhook router.
///
/// Every route expects a [`TenantContext`](hireflow_core::TenantContext)
/// extension, injected by the caller's auth middleware.
pub fn webhooks_router(state: WebhooksState) -> Router {
    Router::new()
        // Config CRUD
        .route(
            "/webhooks",
            post(configs::create_webhook_handler).get(configs::list_webhooks_handler),
        )
        .route(
            "/webhooks/{id}",
            get(configs::get_webhook_handler)
                .patch(configs::update_webhook_handler)
                .delete(configs::delete_webhook_handler),
        )
        // Catalog
        .route(
            "/webhooks/event-types",
            get(configs::list_event_types_handler),
        )
        // Secret rotation and test delivery
        .route(
            "/webhooks/{id}/regenerate-secret",
            post(configs::regenerate_secret_handler),
        )
        .route("/webhooks/{id}/test", post(configs::send_test_handler))
        .with_state(state)
}
