//! JSON invoice snapshots: `{ "<tenant uuid>": [invoice, ...], ... }`.

use std::collections::HashMap;
use std::path::Path;

use tallyerp_core::TenantId;
use tallyerp_invoicing::Invoice;

use crate::read_model::InMemoryInvoiceStore;
use crate::source::InvoiceSourceError;

pub fn parse_snapshot(json: &str) -> Result<HashMap<TenantId, Vec<Invoice>>, InvoiceSourceError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<InMemoryInvoiceStore, InvoiceSourceError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| InvoiceSourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let tenants = parse_snapshot(&raw)?;

    let invoice_count: usize = tenants.values().map(Vec::len).sum();
    tracing::info!(
        path = %path.display(),
        tenants = tenants.len(),
        invoices = invoice_count,
        "loaded invoice snapshot"
    );
    Ok(InMemoryInvoiceStore::from_tenants(tenants))
}
