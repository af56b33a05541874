//! Receivables aging, balance-sheet aggregation and cash-flow projection.
//!
//! Everything in this crate is a pure, synchronous function of its inputs:
//! an already-fetched invoice list, a period, an as-of date and a
//! [`ReportingConfig`]. There is no IO and no failure path; malformed invoice
//! fields degrade to documented fallbacks.
//!
//! Flow: [`classify`] each invoice → [`BalanceSheetAggregator`] reduces to a
//! [`BalanceSheetReport`] → optional overrides → optional
//! [`ProjectionEngine`] forecasts. [`ReportEngine`] strings the steps together.

pub mod aging;
pub mod balance_sheet;
pub mod config;
pub mod engine;
pub mod overrides;
pub mod projection;

pub use aging::{
    AgingBalance, AgingBreakdown, AgingBucket, AgingSchedule, Classification, OVERDUE_SCHEDULE,
    PENDING_SCHEDULE, StatusBucket, classify,
};
pub use balance_sheet::{
    Assets, BalanceSheetAggregator, BalanceSheetReport, InvoiceMetrics, Liabilities, ReportPeriod,
    Summary, Taxes,
};
pub use config::{
    BalanceSheetDefaults, CashflowAssumptions, CollectionRates, ProjectionAssumptions,
    ReportingConfig,
};
pub use engine::{ReportEngine, ReportRequest};
pub use overrides::{
    AgingBalanceOverride, AssetOverrides, BreakdownOverride, LiabilityOverrides, TaxesOverride,
};
pub use projection::{
    Cashflow, CollectionForecast, HORIZON_SOURCES, Horizon, ProjectionEngine, Projections,
    monthly_revenue_trend,
};
