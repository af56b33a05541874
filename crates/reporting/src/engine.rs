//! One call from invoice snapshot to finished report.

use chrono::NaiveDate;

use tallyerp_invoicing::Invoice;

use crate::balance_sheet::{BalanceSheetAggregator, BalanceSheetReport, ReportPeriod};
use crate::config::{CollectionRates, ProjectionAssumptions, ReportingConfig};
use crate::overrides::{AssetOverrides, LiabilityOverrides};
use crate::projection::ProjectionEngine;

/// Parameters of a single report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub period: ReportPeriod,
    pub as_of: NaiveDate,
    pub custom_assets: AssetOverrides,
    pub custom_liabilities: LiabilityOverrides,
    pub include_projections: bool,
    /// Replaces the configured rates for this run only.
    pub collection_rates: Option<CollectionRates>,
}

impl ReportRequest {
    pub fn new(period: ReportPeriod, as_of: NaiveDate) -> Self {
        Self {
            period,
            as_of,
            custom_assets: AssetOverrides::default(),
            custom_liabilities: LiabilityOverrides::default(),
            include_projections: false,
            collection_rates: None,
        }
    }
}

/// Aggregate → overrides → projections.
///
/// Holds only configuration, so one instance can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ReportEngine {
    aggregator: BalanceSheetAggregator,
    projections: ProjectionEngine,
}

impl ReportEngine {
    pub fn new(config: ReportingConfig) -> Self {
        Self {
            aggregator: BalanceSheetAggregator::new(config.defaults),
            projections: ProjectionEngine::new(config.projection),
        }
    }

    pub fn aggregator(&self) -> &BalanceSheetAggregator {
        &self.aggregator
    }

    pub fn projection_assumptions(&self) -> &ProjectionAssumptions {
        self.projections.assumptions()
    }

    pub fn generate(&self, invoices: &[Invoice], request: &ReportRequest) -> BalanceSheetReport {
        let mut report = self
            .aggregator
            .aggregate(invoices, request.period, request.as_of);

        if !request.custom_assets.is_empty() || !request.custom_liabilities.is_empty() {
            report = report.with_overrides(&request.custom_assets, &request.custom_liabilities);
        }

        if request.include_projections {
            let engine = match request.collection_rates {
                Some(rates) => self.projections.clone().with_collection_rates(rates),
                None => self.projections.clone(),
            };
            let projections = engine.project(&report, invoices);
            report = report.with_projections(projections);
        }

        report
    }
}
