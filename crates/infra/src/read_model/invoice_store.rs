use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use tallyerp_core::TenantId;
use tallyerp_invoicing::{Invoice, InvoiceId};
use tallyerp_reporting::ReportPeriod;

use crate::source::{InvoiceSource, InvoiceSourceError};

/// In-memory tenant-isolated invoice store for tests/dev.
///
/// Invoices are keyed by id within a tenant, so re-inserting an id replaces
/// the earlier snapshot. Listing order is by id, which keeps report input
/// stable across calls.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    inner: RwLock<HashMap<TenantId, BTreeMap<InvoiceId, Invoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from per-tenant invoice lists.
    pub fn from_tenants(tenants: impl IntoIterator<Item = (TenantId, Vec<Invoice>)>) -> Self {
        let store = Self::new();
        for (tenant_id, invoices) in tenants {
            store.upsert_many(tenant_id, invoices);
        }
        store
    }

    pub fn upsert(&self, tenant_id: TenantId, invoice: Invoice) {
        self.upsert_many(tenant_id, [invoice]);
    }

    pub fn upsert_many(&self, tenant_id: TenantId, invoices: impl IntoIterator<Item = Invoice>) {
        if let Ok(mut map) = self.inner.write() {
            let tenant = map.entry(tenant_id).or_default();
            for invoice in invoices {
                tenant.insert(invoice.id.clone(), invoice);
            }
        }
    }

    /// Every invoice of a tenant, regardless of date.
    pub fn list(&self, tenant_id: TenantId) -> Vec<Invoice> {
        match self.inner.read() {
            Ok(map) => map
                .get(&tenant_id)
                .map(|t| t.values().cloned().collect())
                .unwrap_or_default(),
            Err(_) => vec![],
        }
    }

    pub fn tenant_count(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn clear_tenant(&self, tenant_id: TenantId) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(&tenant_id);
        }
    }
}

#[async_trait::async_trait]
impl InvoiceSource for InMemoryInvoiceStore {
    async fn fetch_invoices(
        &self,
        tenant_id: TenantId,
        period: &ReportPeriod,
    ) -> Result<Vec<Invoice>, InvoiceSourceError> {
        let map = self
            .inner
            .read()
            .map_err(|_| InvoiceSourceError::Unavailable("invoice store lock poisoned".into()))?;

        // Undated invoices cannot be placed in a period and are left out.
        let invoices = map
            .get(&tenant_id)
            .map(|t| {
                t.values()
                    .filter(|i| i.issued_within(period.start_date, period.end_date))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        tracing::debug!(
            tenant_id = %tenant_id,
            start = %period.start_date,
            end = %period.end_date,
            count = invoices.len(),
            "fetched invoices"
        );
        Ok(invoices)
    }
}
