use std::sync::Arc;

use anyhow::Context;

use tallyerp_core::TenantId;
use tallyerp_infra::{InMemoryInvoiceStore, InvoiceSource, InvoiceSourceError, snapshot};
use tallyerp_invoicing::Invoice;
use tallyerp_reporting::{CollectionRates, ReportEngine, ReportPeriod, ReportingConfig};

use crate::config::{ApiConfig, DEFAULT_LOOKBACK_MONTHS};

/// Shared state behind every request: where invoices come from and how
/// reports are built. Immutable after startup.
pub struct AppServices {
    source: Arc<dyn InvoiceSource>,
    engine: ReportEngine,
    default_lookback_months: u32,
}

impl AppServices {
    pub fn new(
        source: Arc<dyn InvoiceSource>,
        engine: ReportEngine,
        default_lookback_months: u32,
    ) -> Self {
        Self {
            source,
            engine,
            default_lookback_months,
        }
    }

    /// Default configuration over an in-memory store. Used by tests and
    /// local runs without a snapshot.
    pub fn in_memory(store: Arc<InMemoryInvoiceStore>) -> Self {
        Self::new(
            store,
            ReportEngine::new(ReportingConfig::default()),
            DEFAULT_LOOKBACK_MONTHS,
        )
    }

    pub async fn fetch_invoices(
        &self,
        tenant_id: TenantId,
        period: &ReportPeriod,
    ) -> Result<Vec<Invoice>, InvoiceSourceError> {
        self.source.fetch_invoices(tenant_id, period).await
    }

    pub fn engine(&self) -> &ReportEngine {
        &self.engine
    }

    pub fn default_lookback_months(&self) -> u32 {
        self.default_lookback_months
    }

    /// Configured rates; request-level rates are layered over these.
    pub fn collection_rates(&self) -> CollectionRates {
        self.engine.projection_assumptions().collection_rates
    }
}

pub fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let store = match &config.invoice_snapshot_path {
        Some(path) => snapshot::load_snapshot(path)
            .with_context(|| format!("failed to load invoice snapshot {}", path.display()))?,
        None => {
            tracing::warn!("INVOICE_SNAPSHOT_PATH not set; serving reports from an empty store");
            InMemoryInvoiceStore::new()
        }
    };

    let reporting = config
        .load_reporting_config()
        .context("failed to load reporting config")?;

    Ok(AppServices::new(
        Arc::new(store),
        ReportEngine::new(reporting),
        config.default_lookback_months,
    ))
}
