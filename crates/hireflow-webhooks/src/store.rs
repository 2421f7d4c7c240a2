//! Tenant-scoped persistence for webhook configurations.
//!
//! The registry reads and writes whole per-tenant config lists through the
//! [`ConfigStore`] trait. Stored lists may contain configs written by newer
//! schema versions; the store returns them verbatim and callers decide what
//! to skip.

use std::collections::HashMap;

use async_trait::async_trait;
use hireflow_core::TenantId;
use tokio::sync::RwLock;

use crate::models::WebhookConfig;

/// Error raised by a config store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("config store unavailable: {0}")]
    Unavailable(String),
}

/// Backend holding each tenant's webhook configuration list.
///
/// `load` returns every stored config for the tenant, including entries with
/// unrecognized schema versions. `put` replaces the tenant's full list, so
/// callers must write back entries they do not understand.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self, tenant_id: TenantId) -> Result<Vec<WebhookConfig>, StoreError>;

    async fn put(
        &self,
        tenant_id: TenantId,
        configs: Vec<WebhookConfig>,
    ) -> Result<(), StoreError>;
}

/// In-memory [`ConfigStore`] keyed by tenant.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    inner: RwLock<HashMap<TenantId, Vec<WebhookConfig>>>,
}

impl InMemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn load(&self, tenant_id: TenantId) -> Result<Vec<WebhookConfig>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.get(&tenant_id).cloned().unwrap_or_default())
    }

    async fn put(
        &self,
        tenant_id: TenantId,
        configs: Vec<WebhookConfig>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if configs.is_empty() {
            inner.remove(&tenant_id);
        } else {
            inner.insert(tenant_id, configs);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;
    use hireflow_core::{WebhookEventType, WebhookId};

    use super::*;
    use crate::models::CURRENT_SCHEMA_VERSION;

    fn sample_config(tenant_id: TenantId) -> WebhookConfig {
        let now = Utc::now();
        WebhookConfig {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: WebhookId::generate(),
            tenant_id,
            name: "store test".to_string(),
            url: "https://example.com/hook".to_string(),
            secret: "whsec_test".to_string(),
            events: vec![WebhookEventType::CandidateCreated],
            is_active: true,
            retry_count: 3,
            headers: HashMap::new(),
            created_at: now,
            updated_at: now,
            last_triggered_at: None,
        }
    }

    #[tokio::test]
    async fn test_load_unknown_tenant_returns_empty() {
        let store = InMemoryConfigStore::new();
        let configs = store.load(TenantId::new()).await.unwrap();
        assert!(configs.is_empty());
    }

    #[tokio::test]
    async fn test_put_then_load_round_trips() {
        let store = InMemoryConfigStore::new();
        let tenant_id = TenantId::new();
        let config = sample_config(tenant_id);
        let id = config.id.clone();

        store.put(tenant_id, vec![config]).await.unwrap();

        let loaded = store.load(tenant_id).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_list() {
        let store = InMemoryConfigStore::new();
        let tenant_id = TenantId::new();

        store
            .put(tenant_id, vec![sample_config(tenant_id), sample_config(tenant_id)])
            .await
            .unwrap();
        let replacement = sample_config(tenant_id);
        let replacement_id = replacement.id.clone();
        store.put(tenant_id, vec![replacement]).await.unwrap();

        let loaded = store.load(tenant_id).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, replacement_id);
    }

    #[tokio::test]
    async fn test_put_empty_clears_tenant() {
        let store = InMemoryConfigStore::new();
        let tenant_id = TenantId::new();

        store.put(tenant_id, vec![sample_config(tenant_id)]).await.unwrap();
        store.put(tenant_id, Vec::new()).await.unwrap();

        assert!(store.load(tenant_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tenants_are_isolated() {
        let store = InMemoryConfigStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        store.put(tenant_a, vec![sample_config(tenant_a)]).await.unwrap();

        assert_eq!(store.load(tenant_a).await.unwrap().len(), 1);
        assert!(store.load(tenant_b).await.unwrap().is_empty());
    }
}
