use tallyerp_core::TenantId;

/// Tenant a report request runs for, inserted by
/// [`crate::middleware::tenant_middleware`]. Every report route reads it;
/// invoices of other tenants are never visible through it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
