//! Request-scoped tenant identity.

use serde::{Deserialize, Serialize};

use crate::ids::TenantId;

/// Tenant identity attached to each request by the host application.
///
/// hireflow services read this from the request extensions; how it gets
/// there (session, API key, JWT) is the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: TenantId,
}

impl TenantContext {
    /// Create a context for the given tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }
}
