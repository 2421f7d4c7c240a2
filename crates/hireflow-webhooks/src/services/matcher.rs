//! Event-to-subscription matching.

use hireflow_core::WebhookEventType;

use crate::models::WebhookConfig;

/// Whether a config should receive the given event.
///
/// A config matches when it is active and explicitly subscribed to the event
/// type. Reserved event types never match; they are only deliverable through
/// the explicit test endpoint.
#[must_use]
pub fn matches(config: &WebhookConfig, event_type: WebhookEventType) -> bool {
    if !event_type.is_subscribable() {
        return false;
    }
    config.is_active && config.events.contains(&event_type)
}

/// Filter a tenant's configs down to those receiving the given event.
#[must_use]
pub fn select(configs: Vec<WebhookConfig>, event_type: WebhookEventType) -> Vec<WebhookConfig> {
    configs
        .into_iter()
        .filter(|config| matches(config, event_type))
        .collect()
}
