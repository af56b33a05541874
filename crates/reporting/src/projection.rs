//! Projection Engine: collection estimates, cash flow and monthly revenue.
//!
//! Each projection horizon is fed by one aging bucket. The pairing is offset
//! by one step (the 60-day horizon reads the `overdue30` bucket, and so on);
//! [`HORIZON_SOURCES`] is the single place that pairing is defined.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use tallyerp_invoicing::Invoice;

use crate::aging::AgingBucket;
use crate::balance_sheet::BalanceSheetReport;
use crate::config::{CollectionRates, ProjectionAssumptions};

/// Forecast horizon for receivable collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Horizon {
    Next30Days,
    Next60Days,
    Next90Days,
    Beyond90Days,
}

/// Which aging bucket (and collection rate) feeds each horizon.
pub const HORIZON_SOURCES: [(Horizon, AgingBucket); 4] = [
    (Horizon::Next30Days, AgingBucket::Current),
    (Horizon::Next60Days, AgingBucket::Overdue30),
    (Horizon::Next90Days, AgingBucket::Overdue60),
    (Horizon::Beyond90Days, AgingBucket::Overdue90Plus),
];

/// Expected collections per horizon, rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionForecast {
    pub next30_days: Decimal,
    pub next60_days: Decimal,
    pub next90_days: Decimal,
    pub beyond90_days: Decimal,
}

impl CollectionForecast {
    pub fn get(&self, horizon: Horizon) -> Decimal {
        match horizon {
            Horizon::Next30Days => self.next30_days,
            Horizon::Next60Days => self.next60_days,
            Horizon::Next90Days => self.next90_days,
            Horizon::Beyond90Days => self.beyond90_days,
        }
    }

    fn set(&mut self, horizon: Horizon, value: Decimal) {
        match horizon {
            Horizon::Next30Days => self.next30_days = value,
            Horizon::Next60Days => self.next60_days = value,
            Horizon::Next90Days => self.next90_days = value,
            Horizon::Beyond90Days => self.beyond90_days = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cashflow {
    pub inflows: Decimal,
    pub outflows: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projections {
    pub accounts_receivable_collections: CollectionForecast,
    pub cashflow: Cashflow,
    /// Invoiced amount per `YYYY-MM`; months without invoices are absent.
    pub monthly_revenue_trend: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    assumptions: ProjectionAssumptions,
}

impl ProjectionEngine {
    pub fn new(assumptions: ProjectionAssumptions) -> Self {
        Self { assumptions }
    }

    /// Same cash-flow assumptions, different collection rates.
    pub fn with_collection_rates(mut self, rates: CollectionRates) -> Self {
        self.assumptions.collection_rates = rates;
        self
    }

    pub fn assumptions(&self) -> &ProjectionAssumptions {
        &self.assumptions
    }

    /// Reads the (possibly overridden) receivables breakdown and payables
    /// total from `report`; the revenue trend comes from the raw invoices.
    pub fn project(&self, report: &BalanceSheetReport, invoices: &[Invoice]) -> Projections {
        let collections = self.collections(report);
        let cashflow = self.cashflow(&collections, report.liabilities().accounts_payable.total);

        Projections {
            accounts_receivable_collections: collections,
            cashflow,
            monthly_revenue_trend: monthly_revenue_trend(invoices),
        }
    }

    fn collections(&self, report: &BalanceSheetReport) -> CollectionForecast {
        let receivables = &report.assets().accounts_receivable.breakdown;
        let rates = &self.assumptions.collection_rates;

        let mut forecast = CollectionForecast::default();
        for (horizon, bucket) in HORIZON_SOURCES {
            let expected = receivables.get(bucket).saturating_mul(rates.rate(bucket));
            forecast.set(horizon, round_half_away_from_zero(expected));
        }
        forecast
    }

    fn cashflow(&self, collections: &CollectionForecast, payables_total: Decimal) -> Cashflow {
        let weights = &self.assumptions.cashflow;
        // Collections beyond 90 days are not near-term cash.
        let inflows = collections
            .next30_days
            .saturating_add(weights.next60_weight.saturating_mul(collections.next60_days))
            .saturating_add(weights.next90_weight.saturating_mul(collections.next90_days));
        let outflows = payables_total.saturating_mul(weights.payables_payment_rate);
        Cashflow {
            inflows,
            outflows,
            net: inflows.saturating_sub(outflows),
        }
    }
}

/// Sum of `total_amount` per issue month (`YYYY-MM`), across every status.
/// Invoices without a readable issue date are skipped.
pub fn monthly_revenue_trend(invoices: &[Invoice]) -> BTreeMap<String, Decimal> {
    let mut trend = BTreeMap::new();
    for invoice in invoices {
        let Some(date) = invoice.date else {
            continue;
        };
        let key = format!("{:04}-{:02}", date.year(), date.month());
        let month = trend.entry(key).or_insert(Decimal::ZERO);
        *month = month.saturating_add(invoice.amount());
    }
    trend
}

fn round_half_away_from_zero(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance_sheet::{BalanceSheetAggregator, ReportPeriod};
    use crate::overrides::{
        AgingBalanceOverride, AssetOverrides, BreakdownOverride, LiabilityOverrides,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn as_of() -> NaiveDate {
        d(2024, 6, 30)
    }

    fn report_with_receivables(breakdown: BreakdownOverride) -> BalanceSheetReport {
        BalanceSheetAggregator::default()
            .aggregate(&[], ReportPeriod::trailing_months(as_of(), 3), as_of())
            .with_overrides(
                &AssetOverrides {
                    accounts_receivable: Some(AgingBalanceOverride {
                        total: None,
                        breakdown,
                    }),
                    ..Default::default()
                },
                &LiabilityOverrides::default(),
            )
    }

    #[test]
    fn current_bucket_drives_next_30_days() {
        let report = report_with_receivables(BreakdownOverride {
            current: Some(dec!(1000)),
            ..Default::default()
        });
        let p = ProjectionEngine::default().project(&report, &[]);
        assert_eq!(p.accounts_receivable_collections.next30_days, dec!(900));
    }

    #[test]
    fn horizons_lag_buckets_by_one_step() {
        let report = report_with_receivables(BreakdownOverride {
            current: Some(dec!(0)),
            overdue30: Some(dec!(100)),
            overdue60: Some(dec!(200)),
            overdue90_plus: Some(dec!(400)),
        });
        let c = ProjectionEngine::default()
            .project(&report, &[])
            .accounts_receivable_collections;

        assert_eq!(c.next30_days, dec!(0));
        assert_eq!(c.next60_days, dec!(75)); // overdue30 × 0.75
        assert_eq!(c.next90_days, dec!(100)); // overdue60 × 0.50
        assert_eq!(c.beyond90_days, dec!(100)); // overdue90Plus × 0.25
        for (horizon, bucket) in HORIZON_SOURCES {
            let expected = report.assets().accounts_receivable.breakdown.get(bucket)
                * CollectionRates::default().rate(bucket);
            assert_eq!(c.get(horizon), round_half_away_from_zero(expected));
        }
    }

    #[test]
    fn collections_round_half_away_from_zero() {
        // 5 × 0.90 = 4.5 → 5; 3 × 0.50 = 1.5 → 2.
        let report = report_with_receivables(BreakdownOverride {
            current: Some(dec!(5)),
            overdue60: Some(dec!(3)),
            overdue90_plus: Some(dec!(2)),
            ..Default::default()
        });
        let c = ProjectionEngine::default()
            .project(&report, &[])
            .accounts_receivable_collections;
        assert_eq!(c.next30_days, dec!(5));
        assert_eq!(c.next90_days, dec!(2));
        assert_eq!(c.beyond90_days, dec!(1)); // 2 × 0.25 = 0.5

        assert_eq!(round_half_away_from_zero(dec!(-2.5)), dec!(-3));
        assert_eq!(round_half_away_from_zero(dec!(2.4)), dec!(2));
    }

    #[test]
    fn cashflow_weights_later_collections_and_payables() {
        let report = report_with_receivables(BreakdownOverride {
            current: Some(dec!(1000)),
            overdue30: Some(dec!(1000)),
            overdue60: Some(dec!(1000)),
            overdue90_plus: Some(dec!(1000)),
        });
        let cf = ProjectionEngine::default().project(&report, &[]).cashflow;

        // 900 + 0.8 × 750 + 0.6 × 500; beyond-90 collections excluded.
        assert_eq!(cf.inflows, dec!(1800));
        // Default payables 85,000 × 0.7.
        assert_eq!(cf.outflows, dec!(59500));
        assert_eq!(cf.net, dec!(-57700));
    }

    #[test]
    fn custom_rates_replace_defaults() {
        let report = report_with_receivables(BreakdownOverride {
            current: Some(dec!(1000)),
            ..Default::default()
        });
        let rates = CollectionRates {
            current: dec!(0.5),
            ..CollectionRates::default()
        };
        let p = ProjectionEngine::default()
            .with_collection_rates(rates)
            .project(&report, &[]);
        assert_eq!(p.accounts_receivable_collections.next30_days, dec!(500));
    }

    #[test]
    fn monthly_trend_groups_by_issue_month() {
        let invoices = vec![
            Invoice::new("a", dec!(100), "paid", d(2024, 1, 15), d(2024, 2, 14)),
            Invoice::new("b", dec!(200), "pending", d(2024, 2, 1), d(2024, 3, 2)),
        ];
        let trend = monthly_revenue_trend(&invoices);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend["2024-01"], dec!(100));
        assert_eq!(trend["2024-02"], dec!(200));
    }

    #[test]
    fn monthly_trend_sums_all_statuses_and_skips_gaps() {
        let mut undated = Invoice::new("u", dec!(7), "pending", d(2024, 1, 1), d(2024, 1, 1));
        undated.date = None;
        let invoices = vec![
            Invoice::new("a", dec!(100), "paid", d(2023, 11, 3), d(2023, 12, 3)),
            Invoice::new("b", dec!(50), "draft", d(2023, 11, 28), d(2023, 12, 28)),
            Invoice::new("c", dec!(25), "overdue", d(2024, 1, 9), d(2024, 2, 8)),
            undated,
        ];
        let trend = monthly_revenue_trend(&invoices);
        assert_eq!(
            trend.into_iter().collect::<Vec<_>>(),
            vec![
                ("2023-11".to_string(), dec!(150)),
                ("2024-01".to_string(), dec!(25)),
            ]
        );
    }

    #[test]
    fn projections_serialize_with_report_keys() {
        let report = report_with_receivables(Default::default());
        let p = ProjectionEngine::default().project(&report, &[]);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json["accountsReceivableCollections"].get("next30Days").is_some());
        assert!(json["accountsReceivableCollections"].get("beyond90Days").is_some());
        assert!(json["cashflow"].get("net").is_some());
        assert!(json["monthlyRevenueTrend"].is_object());
    }
}
