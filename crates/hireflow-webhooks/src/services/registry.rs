//! Webhook configuration registry.
//!
//! Owns the lifecycle of a tenant's webhook configs: registration with
//! URL/event/header validation and the per-tenant cap, partial updates,
//! secret rotation, and removal. All mutations for a tenant are serialized
//! through a per-tenant lock so concurrent read-modify-write cycles cannot
//! lose each other's writes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hireflow_core::{TenantId, WebhookId};
use tokio::sync::Mutex;

use crate::crypto;
use crate::error::{ApiResult, WebhookError};
use crate::models::{
    CreateWebhookRequest, UpdateWebhookRequest, WebhookConfig, WebhookConfigView,
    WebhookListResponse, WebhookWithSecret, CURRENT_SCHEMA_VERSION, DEFAULT_RETRY_COUNT,
    MAX_RETRY_COUNT,
};
use crate::store::ConfigStore;
use crate::validation::{
    validate_custom_headers, validate_event_types, validate_webhook_url, UrlPolicy,
};

/// Webhook configs a single tenant may hold.
pub const DEFAULT_MAX_CONFIGS: usize = 10;

/// Registry of tenant webhook configurations.
pub struct WebhookRegistry {
    store: Arc<dyn ConfigStore>,
    url_policy: UrlPolicy,
    max_configs: usize,
    tenant_locks: Mutex<HashMap<TenantId, Arc<Mutex<()>>>>,
}

impl WebhookRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            url_policy: UrlPolicy::default(),
            max_configs: DEFAULT_MAX_CONFIGS,
            tenant_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Override the per-tenant config cap.
    #[must_use]
    pub fn with_max_configs(mut self, max_configs: usize) -> Self {
        self.max_configs = max_configs;
        self
    }

    /// Override the delivery URL policy.
    #[must_use]
    pub fn with_url_policy(mut self, url_policy: UrlPolicy) -> Self {
        self.url_policy = url_policy;
        self
    }

    // -----------------------------------------------------------------------
    // Config lifecycle
    // -----------------------------------------------------------------------

    /// Register a new webhook for the tenant.
    ///
    /// Returns the stored config together with its signing secret. This is
    /// one of only two places the secret is ever returned; store it now.
    pub async fn create_webhook(
        &self,
        tenant_id: TenantId,
        request: CreateWebhookRequest,
    ) -> ApiResult<WebhookWithSecret> {
        validate_webhook_url(&request.url, &self.url_policy)?;
        let events = validate_event_types(&request.events)?;
        let headers = request.headers.unwrap_or_default();
        validate_custom_headers(&headers)?;

        let retry_count = request.retry_count.unwrap_or(DEFAULT_RETRY_COUNT);
        if !(1..=MAX_RETRY_COUNT).contains(&retry_count) {
            return Err(WebhookError::Validation(format!(
                "retryCount must be between 1 and {MAX_RETRY_COUNT}"
            )));
        }

        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let mut configs = self.store.load(tenant_id).await?;
        // The cap counts every stored config, including entries this code
        // cannot read.
        if configs.len() >= self.max_configs {
            return Err(WebhookError::WebhookLimitExceeded {
                limit: self.max_configs,
            });
        }

        let now = Utc::now();
        let config = WebhookConfig {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: WebhookId::generate(),
            tenant_id,
            name: request.name,
            url: request.url,
            secret: crypto::generate_secret(),
            events,
            is_active: true,
            retry_count,
            headers,
            created_at: now,
            updated_at: now,
            last_triggered_at: None,
        };

        let secret = config.secret.clone();
        let view: WebhookConfigView = config.clone().into();
        configs.push(config);
        self.store.put(tenant_id, configs).await?;

        tracing::info!(
            target: "webhook_registry",
            tenant_id = %tenant_id,
            webhook_id = %view.id,
            events = view.events.len(),
            "Webhook registered"
        );

        Ok(WebhookWithSecret {
            webhook: view,
            secret,
        })
    }

    /// Fetch a single webhook config, secret redacted.
    pub async fn get_webhook(
        &self,
        tenant_id: TenantId,
        id: &WebhookId,
    ) -> ApiResult<WebhookConfigView> {
        let configs = self.load_supported(tenant_id).await?;
        configs
            .into_iter()
            .find(|config| config.id == *id)
            .map(WebhookConfigView::from)
            .ok_or(WebhookError::WebhookNotFound)
    }

    /// List the tenant's webhooks in creation order, secrets redacted.
    pub async fn list_webhooks(&self, tenant_id: TenantId) -> ApiResult<WebhookListResponse> {
        let configs = self.load_supported(tenant_id).await?;
        let items: Vec<WebhookConfigView> =
            configs.into_iter().map(WebhookConfigView::from).collect();
        let total = items.len();
        Ok(WebhookListResponse { items, total })
    }

    /// Apply a partial update. Absent fields keep their stored values;
    /// `retry_count` is fixed at creation and cannot be changed here.
    pub async fn update_webhook(
        &self,
        tenant_id: TenantId,
        id: &WebhookId,
        request: UpdateWebhookRequest,
    ) -> ApiResult<WebhookConfigView> {
        if let Some(url) = &request.url {
            validate_webhook_url(url, &self.url_policy)?;
        }
        let parsed_events = match &request.events {
            Some(events) => Some(validate_event_types(events)?),
            None => None,
        };
        if let Some(headers) = &request.headers {
            validate_custom_headers(headers)?;
        }

        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let mut configs = self.store.load(tenant_id).await?;
        let config = configs
            .iter_mut()
            .find(|config| config.has_supported_schema() && config.id == *id)
            .ok_or(WebhookError::WebhookNotFound)?;

        if let Some(name) = request.name {
            config.name = name;
        }
        if let Some(url) = request.url {
            config.url = url;
        }
        if let Some(events) = parsed_events {
            config.events = events;
        }
        if let Some(is_active) = request.is_active {
            config.is_active = is_active;
        }
        if let Some(headers) = request.headers {
            config.headers = headers;
        }
        config.updated_at = Utc::now();

        let view: WebhookConfigView = config.clone().into();
        self.store.put(tenant_id, configs).await?;
        Ok(view)
    }

    /// Remove a webhook permanently.
    pub async fn delete_webhook(&self, tenant_id: TenantId, id: &WebhookId) -> ApiResult<()> {
        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let mut configs = self.store.load(tenant_id).await?;
        let before = configs.len();
        configs.retain(|config| !(config.has_supported_schema() && config.id == *id));
        if configs.len() == before {
            return Err(WebhookError::WebhookNotFound);
        }
        self.store.put(tenant_id, configs).await?;

        tracing::info!(
            target: "webhook_registry",
            tenant_id = %tenant_id,
            webhook_id = %id,
            "Webhook deleted"
        );
        Ok(())
    }

    /// Replace the signing secret.
    ///
    /// The previous secret stops working immediately; deliveries already in
    /// flight were signed with the secret read at dispatch time.
    pub async fn regenerate_secret(
        &self,
        tenant_id: TenantId,
        id: &WebhookId,
    ) -> ApiResult<WebhookWithSecret> {
        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let mut configs = self.store.load(tenant_id).await?;
        let config = configs
            .iter_mut()
            .find(|config| config.has_supported_schema() && config.id == *id)
            .ok_or(WebhookError::WebhookNotFound)?;

        config.secret = crypto::generate_secret();
        config.updated_at = Utc::now();
        let secret = config.secret.clone();
        let view: WebhookConfigView = config.clone().into();
        self.store.put(tenant_id, configs).await?;

        tracing::info!(
            target: "webhook_registry",
            tenant_id = %tenant_id,
            webhook_id = %view.id,
            "Webhook secret regenerated"
        );

        Ok(WebhookWithSecret {
            webhook: view,
            secret,
        })
    }

    // -----------------------------------------------------------------------
    // Dispatch support
    // -----------------------------------------------------------------------

    /// All configs eligible for dispatch, secrets included.
    pub(crate) async fn dispatchable_configs(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<WebhookConfig>, WebhookError> {
        self.load_supported(tenant_id).await
    }

    /// Look up one config with its secret, for test deliveries.
    pub(crate) async fn find_config(
        &self,
        tenant_id: TenantId,
        id: &WebhookId,
    ) -> ApiResult<WebhookConfig> {
        let configs = self.load_supported(tenant_id).await?;
        configs
            .into_iter()
            .find(|config| config.id == *id)
            .ok_or(WebhookError::WebhookNotFound)
    }

    /// Stamp `last_triggered_at` on the given configs.
    ///
    /// Dispatch bookkeeping only; `updated_at` is left alone.
    pub(crate) async fn touch_last_triggered(
        &self,
        tenant_id: TenantId,
        webhook_ids: &[WebhookId],
        at: DateTime<Utc>,
    ) -> Result<(), WebhookError> {
        if webhook_ids.is_empty() {
            return Ok(());
        }

        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let mut configs = self.store.load(tenant_id).await?;
        let mut touched = false;
        for config in configs.iter_mut() {
            if webhook_ids.contains(&config.id) {
                config.last_triggered_at = Some(at);
                touched = true;
            }
        }
        if touched {
            self.store.put(tenant_id, configs).await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Load the tenant's configs, dropping entries written by a newer schema.
    /// Skipped entries stay in the store untouched.
    async fn load_supported(&self, tenant_id: TenantId) -> Result<Vec<WebhookConfig>, WebhookError> {
        let configs = self.store.load(tenant_id).await?;
        let mut supported = Vec::with_capacity(configs.len());
        for config in configs {
            if config.has_supported_schema() {
                supported.push(config);
            } else {
                tracing::warn!(
                    target: "webhook_registry",
                    tenant_id = %tenant_id,
                    webhook_id = %config.id,
                    schema_version = config.schema_version,
                    "Skipping webhook config with unsupported schema version"
                );
            }
        }
        Ok(supported)
    }

    async fn tenant_lock(&self, tenant_id: TenantId) -> Arc<Mutex<()>> {
        let mut locks = self.tenant_locks.lock().await;
        locks.entry(tenant_id).or_default().clone()
    }
}
