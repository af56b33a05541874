//! Invoice-fetch seam.

use thiserror::Error;

use tallyerp_core::TenantId;
use tallyerp_invoicing::Invoice;
use tallyerp_reporting::ReportPeriod;

#[derive(Debug, Error)]
pub enum InvoiceSourceError {
    #[error("invoice source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read invoice snapshot `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid invoice snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Read-only access to a tenant's invoices.
///
/// This is the only suspension point before report computation; the report
/// engine itself is synchronous.
#[async_trait::async_trait]
pub trait InvoiceSource: Send + Sync {
    /// Invoices of `tenant_id` issued within `period` (inclusive).
    async fn fetch_invoices(
        &self,
        tenant_id: TenantId,
        period: &ReportPeriod,
    ) -> Result<Vec<Invoice>, InvoiceSourceError>;
}
