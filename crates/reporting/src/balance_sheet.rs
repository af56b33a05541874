//! Balance Sheet Aggregator.
//!
//! Reduces an invoice list to receivables, invoice metrics and a summary.
//! Only the receivables side is computed from data; inventory, prepaid
//! expenses, payables and taxes are pass-through values from
//! [`BalanceSheetDefaults`] or caller overrides.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tallyerp_core::{ValueObject, months_before};
use tallyerp_invoicing::Invoice;

use crate::aging::{AgingBalance, AgingBreakdown, Classification, StatusBucket, classify};
use crate::config::BalanceSheetDefaults;
use crate::overrides::{AssetOverrides, LiabilityOverrides};
use crate::projection::Projections;

/// Reporting window (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ValueObject for ReportPeriod {}

impl ReportPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// `months` calendar months back from `end_date`.
    pub fn trailing_months(end_date: NaiveDate, months: u32) -> Self {
        Self::new(months_before(end_date, months), end_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    pub accounts_receivable: AgingBalance,
    pub inventory: Decimal,
    pub prepaid_expenses: Decimal,
}

impl ValueObject for Assets {}

impl Assets {
    pub fn total(&self) -> Decimal {
        self.accounts_receivable
            .total
            .saturating_add(self.inventory)
            .saturating_add(self.prepaid_expenses)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxes {
    pub sales_tax: Decimal,
    pub other_taxes: Decimal,
}

impl ValueObject for Taxes {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liabilities {
    pub accounts_payable: AgingBalance,
    pub taxes: Taxes,
}

impl ValueObject for Liabilities {}

impl Liabilities {
    pub fn total(&self) -> Decimal {
        self.accounts_payable
            .total
            .saturating_add(self.taxes.sales_tax)
            .saturating_add(self.taxes.other_taxes)
    }
}

/// Derived totals and ratios. Always computed from assets and liabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
    /// `total_assets / total_liabilities`, or zero when there are no liabilities.
    pub current_ratio: Decimal,
}

impl ValueObject for Summary {}

impl Summary {
    pub fn derive(assets: &Assets, liabilities: &Liabilities) -> Self {
        let total_assets = assets.total();
        let total_liabilities = liabilities.total();
        Self {
            total_assets,
            total_liabilities,
            net_worth: total_assets.saturating_sub(total_liabilities),
            current_ratio: ratio_or_zero(total_assets, total_liabilities),
        }
    }
}

/// Counts and sums per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMetrics {
    pub invoice_count: u64,
    pub total_invoiced: Decimal,
    pub paid_count: u64,
    pub total_paid: Decimal,
    pub pending_count: u64,
    pub total_pending: Decimal,
    pub overdue_count: u64,
    pub total_overdue: Decimal,
    /// Invoices whose status is none of paid/pending/overdue.
    pub unclassified_count: u64,
    pub total_unclassified: Decimal,
    pub average_invoice_amount: Decimal,
}

impl InvoiceMetrics {
    /// Sums saturate so hostile amounts cannot abort a report.
    fn record(&mut self, c: &Classification) {
        self.invoice_count += 1;
        self.total_invoiced = self.total_invoiced.saturating_add(c.amount);
        match c.status {
            StatusBucket::Paid => {
                self.paid_count += 1;
                self.total_paid = self.total_paid.saturating_add(c.amount);
            }
            StatusBucket::Pending => {
                self.pending_count += 1;
                self.total_pending = self.total_pending.saturating_add(c.amount);
            }
            StatusBucket::Overdue => {
                self.overdue_count += 1;
                self.total_overdue = self.total_overdue.saturating_add(c.amount);
            }
            StatusBucket::Unclassified => {
                self.unclassified_count += 1;
                self.total_unclassified = self.total_unclassified.saturating_add(c.amount);
            }
        }
    }

    fn finish(mut self) -> Self {
        self.average_invoice_amount =
            ratio_or_zero(self.total_invoiced, Decimal::from(self.invoice_count));
        self
    }

    /// Amount still owed to us.
    pub fn receivables(&self) -> Decimal {
        self.total_pending.saturating_add(self.total_overdue)
    }
}

/// Aggregate output. Built fresh per request; the only way to change it is
/// to derive a new report via [`BalanceSheetReport::with_overrides`] or
/// [`BalanceSheetReport::with_projections`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetReport {
    period: ReportPeriod,
    as_of_date: NaiveDate,
    assets: Assets,
    liabilities: Liabilities,
    summary: Summary,
    invoice_metrics: InvoiceMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    projections: Option<Projections>,
}

impl BalanceSheetReport {
    fn new(
        period: ReportPeriod,
        as_of_date: NaiveDate,
        assets: Assets,
        liabilities: Liabilities,
        invoice_metrics: InvoiceMetrics,
    ) -> Self {
        Self {
            period,
            as_of_date,
            summary: Summary::derive(&assets, &liabilities),
            assets,
            liabilities,
            invoice_metrics,
            projections: None,
        }
    }

    pub fn period(&self) -> &ReportPeriod {
        &self.period
    }

    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of_date
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn liabilities(&self) -> &Liabilities {
        &self.liabilities
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn invoice_metrics(&self) -> &InvoiceMetrics {
        &self.invoice_metrics
    }

    pub fn projections(&self) -> Option<&Projections> {
        self.projections.as_ref()
    }

    /// Merge partial overrides into assets/liabilities and re-derive the summary
    /// from the merged state.
    pub fn with_overrides(
        mut self,
        assets: &AssetOverrides,
        liabilities: &LiabilityOverrides,
    ) -> Self {
        self.assets = assets.apply(&self.assets);
        self.liabilities = liabilities.apply(&self.liabilities);
        self.summary = Summary::derive(&self.assets, &self.liabilities);
        self
    }

    pub fn with_projections(mut self, projections: Projections) -> Self {
        self.projections = Some(projections);
        self
    }
}

/// Drives the classifier over an invoice list and reduces the results.
#[derive(Debug, Clone, Default)]
pub struct BalanceSheetAggregator {
    defaults: BalanceSheetDefaults,
}

impl BalanceSheetAggregator {
    pub fn new(defaults: BalanceSheetDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &BalanceSheetDefaults {
        &self.defaults
    }

    /// Single pass over `invoices`. Deterministic for a fixed input and `as_of`.
    pub fn aggregate(
        &self,
        invoices: &[Invoice],
        period: ReportPeriod,
        as_of: NaiveDate,
    ) -> BalanceSheetReport {
        let mut metrics = InvoiceMetrics::default();
        let mut receivables = AgingBreakdown::default();

        for invoice in invoices {
            let c = classify(invoice, as_of);
            metrics.record(&c);
            if let Some(bucket) = c.aging {
                receivables.add(bucket, c.amount);
            }
        }
        let metrics = metrics.finish();

        if metrics.unclassified_count > 0 {
            tracing::warn!(
                unclassified_count = metrics.unclassified_count,
                total_unclassified = %metrics.total_unclassified,
                "invoices with unrecognized status excluded from receivables"
            );
        }

        let assets = Assets {
            accounts_receivable: AgingBalance {
                total: metrics.receivables(),
                breakdown: receivables,
            },
            inventory: self.defaults.inventory,
            prepaid_expenses: self.defaults.prepaid_expenses,
        };
        let liabilities = Liabilities {
            accounts_payable: self.defaults.accounts_payable,
            taxes: Taxes {
                sales_tax: self.defaults.sales_tax,
                other_taxes: self.defaults.other_taxes,
            },
        };

        let report = BalanceSheetReport::new(period, as_of, assets, liabilities, metrics);
        tracing::debug!(
            invoice_count = metrics.invoice_count,
            receivables = %report.assets.accounts_receivable.total,
            net_worth = %report.summary.net_worth,
            "balance sheet aggregated"
        );
        report
    }
}

fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aging::AgingBucket;
    use crate::overrides::{AgingBalanceOverride, BreakdownOverride, TaxesOverride};
    use chrono::Duration;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn period() -> ReportPeriod {
        ReportPeriod::trailing_months(as_of(), 3)
    }

    fn invoice(id: &str, status: &str, amount: Decimal, days_past_due: i64) -> Invoice {
        let due = as_of() - Duration::days(days_past_due);
        Invoice::new(id, amount, status, due - Duration::days(30), due)
    }

    fn aggregate(invoices: &[Invoice]) -> BalanceSheetReport {
        BalanceSheetAggregator::default().aggregate(invoices, period(), as_of())
    }

    #[test]
    fn single_pending_invoice_in_grace_window() {
        let report = aggregate(&[invoice("a", "pending", dec!(1000), 10)]);

        let ar = report.assets().accounts_receivable;
        assert_eq!(ar.breakdown.current, dec!(1000));
        assert_eq!(ar.total, dec!(1000));
        assert_eq!(report.invoice_metrics().total_pending, dec!(1000));
        assert_eq!(report.invoice_metrics().pending_count, 1);
    }

    #[test]
    fn single_overdue_invoice_uses_shifted_thresholds() {
        let report = aggregate(&[invoice("a", "overdue", dec!(500), 45)]);

        let ar = report.assets().accounts_receivable;
        assert_eq!(ar.breakdown.overdue60, dec!(500));
        assert_eq!(ar.breakdown.current, Decimal::ZERO);
        assert_eq!(report.invoice_metrics().total_overdue, dec!(500));
        assert_eq!(report.invoice_metrics().overdue_count, 1);
    }

    #[test]
    fn empty_invoice_list_uses_defaults_only() {
        let report = aggregate(&[]);
        let m = report.invoice_metrics();
        assert_eq!(m.invoice_count, 0);
        assert_eq!(m.average_invoice_amount, Decimal::ZERO);

        let s = report.summary();
        // 0 AR + 150k inventory + 25k prepaid vs 85k AP + 12k + 8k taxes.
        assert_eq!(s.total_assets, dec!(175000));
        assert_eq!(s.total_liabilities, dec!(105000));
        assert_eq!(s.net_worth, dec!(70000));
        assert_eq!(s.current_ratio, dec!(175000) / dec!(105000));
        assert!(s.current_ratio > Decimal::ZERO);
    }

    #[test]
    fn current_ratio_is_zero_without_liabilities() {
        let defaults = BalanceSheetDefaults {
            accounts_payable: AgingBalance::default(),
            sales_tax: Decimal::ZERO,
            other_taxes: Decimal::ZERO,
            ..BalanceSheetDefaults::default()
        };
        let report = BalanceSheetAggregator::new(defaults).aggregate(
            &[invoice("a", "pending", dec!(10), 0)],
            period(),
            as_of(),
        );
        assert_eq!(report.summary().total_liabilities, Decimal::ZERO);
        assert_eq!(report.summary().current_ratio, Decimal::ZERO);
    }

    #[test]
    fn paid_invoices_never_reach_receivables() {
        let report = aggregate(&[
            invoice("a", "paid", dec!(300), 100),
            invoice("b", "pending", dec!(100), 0),
        ]);
        let m = report.invoice_metrics();
        assert_eq!(m.total_paid, dec!(300));
        assert_eq!(m.paid_count, 1);
        assert_eq!(m.total_invoiced, dec!(400));
        assert_eq!(m.average_invoice_amount, dec!(200));
        assert_eq!(report.assets().accounts_receivable.total, dec!(100));
    }

    #[test]
    fn unknown_status_is_counted_but_never_bucketed() {
        let report = aggregate(&[
            invoice("a", "draft", dec!(250), 100),
            invoice("b", "overdue", dec!(50), 10),
        ]);
        let m = report.invoice_metrics();
        assert_eq!(m.invoice_count, 2);
        assert_eq!(m.total_invoiced, dec!(300));
        assert_eq!(m.unclassified_count, 1);
        assert_eq!(m.total_unclassified, dec!(250));
        assert_eq!(m.total_paid + m.total_pending + m.total_overdue, dec!(50));

        let ar = report.assets().accounts_receivable;
        assert_eq!(ar.total, dec!(50));
        assert_eq!(ar.breakdown.sum(), dec!(50));
    }

    #[test]
    fn inventory_override_keeps_other_assets() {
        let base = aggregate(&[invoice("a", "pending", dec!(1000), 10)]);
        let before = *base.assets();

        let overridden = base.with_overrides(
            &AssetOverrides {
                inventory: Some(dec!(999)),
                ..Default::default()
            },
            &LiabilityOverrides::default(),
        );

        let after = overridden.assets();
        assert_eq!(after.inventory, dec!(999));
        assert_eq!(after.accounts_receivable, before.accounts_receivable);
        assert_eq!(after.prepaid_expenses, before.prepaid_expenses);
        assert_eq!(
            overridden.summary().total_assets,
            dec!(999) + before.accounts_receivable.total + before.prepaid_expenses
        );
    }

    #[test]
    fn liability_override_recomputes_summary_from_merged_state() {
        let base = aggregate(&[]);
        let overridden = base.with_overrides(
            &AssetOverrides::default(),
            &LiabilityOverrides {
                accounts_payable: Some(AgingBalanceOverride {
                    total: None,
                    breakdown: BreakdownOverride {
                        overdue90_plus: Some(dec!(0)),
                        ..Default::default()
                    },
                }),
                taxes: Some(TaxesOverride {
                    sales_tax: Some(dec!(1000)),
                    other_taxes: None,
                }),
            },
        );

        let l = overridden.liabilities();
        assert_eq!(l.accounts_payable.total, dec!(80000));
        assert_eq!(l.taxes.sales_tax, dec!(1000));
        assert_eq!(l.taxes.other_taxes, dec!(8000));

        let s = overridden.summary();
        assert_eq!(s.total_liabilities, dec!(89000));
        assert_eq!(s, &Summary::derive(overridden.assets(), l));
    }

    fn arb_invoice() -> impl Strategy<Value = Invoice> {
        let status = prop_oneof![
            Just("paid"),
            Just("pending"),
            Just("overdue"),
            Just("draft"),
            Just("cancelled"),
        ];
        (0u64..10_000_000u64, status, -60i64..400i64, any::<bool>()).prop_map(
            |(cents, status, days, has_due)| {
                let mut inv = invoice("p", status, Decimal::new(cents as i64, 2), days);
                if !has_due {
                    inv.due_date = None;
                }
                inv
            },
        )
    }

    #[test]
    fn oversized_amounts_saturate_instead_of_panicking() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let invoices = [
            invoice("a", "pending", huge, 10),
            invoice("b", "pending", huge, 10),
            invoice("c", "overdue", huge, 45),
        ];
        let report = aggregate(&invoices).with_overrides(
            &AssetOverrides {
                inventory: Some(Decimal::MAX),
                ..Default::default()
            },
            &LiabilityOverrides {
                taxes: Some(TaxesOverride {
                    sales_tax: Some(Decimal::MIN),
                    other_taxes: None,
                }),
                ..Default::default()
            },
        );

        let ar = report.assets().accounts_receivable;
        assert_eq!(ar.breakdown.current, Decimal::MAX);
        assert_eq!(ar.total, Decimal::MAX);
        assert_eq!(report.invoice_metrics().total_invoiced, Decimal::MAX);
        assert_eq!(report.summary().total_assets, Decimal::MAX);
        assert_eq!(report.summary().net_worth, Decimal::MAX);

        let p = crate::projection::ProjectionEngine::default().project(&report, &invoices);
        assert!(p.cashflow.inflows > Decimal::ZERO);
        assert_eq!(p.monthly_revenue_trend.values().copied().max(), Some(Decimal::MAX));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Every pending/overdue amount lands in exactly one bucket, so the
        /// buckets sum to the receivables total.
        #[test]
        fn receivables_are_conserved(invoices in prop::collection::vec(arb_invoice(), 0..40)) {
            let report = aggregate(&invoices);
            let ar = report.assets().accounts_receivable;
            let m = report.invoice_metrics();

            prop_assert_eq!(ar.total, m.total_pending + m.total_overdue);
            prop_assert_eq!(ar.breakdown.sum(), ar.total);

            let receivable_amount: Decimal = invoices
                .iter()
                .filter(|i| i.status.is_receivable())
                .map(Invoice::amount)
                .sum();
            prop_assert_eq!(ar.total, receivable_amount);
        }

        #[test]
        fn each_receivable_hits_one_bucket(inv in arb_invoice()) {
            let report = aggregate(std::slice::from_ref(&inv));
            let breakdown = report.assets().accounts_receivable.breakdown;
            let hits = AgingBucket::ALL
                .iter()
                .filter(|b| breakdown.get(**b) == inv.amount() && !inv.amount().is_zero())
                .count();
            if inv.status.is_receivable() && !inv.amount().is_zero() {
                prop_assert_eq!(hits, 1);
            } else {
                prop_assert_eq!(breakdown.sum(), Decimal::ZERO);
            }
        }

        #[test]
        fn aggregation_is_deterministic(invoices in prop::collection::vec(arb_invoice(), 0..40)) {
            prop_assert_eq!(aggregate(&invoices), aggregate(&invoices));
        }

        #[test]
        fn aggregation_is_order_independent(invoices in prop::collection::vec(arb_invoice(), 0..40)) {
            let mut reversed = invoices.clone();
            reversed.reverse();
            prop_assert_eq!(aggregate(&invoices), aggregate(&reversed));
        }

        #[test]
        fn average_is_total_over_count(invoices in prop::collection::vec(arb_invoice(), 0..40)) {
            let m = *aggregate(&invoices).invoice_metrics();
            if m.invoice_count == 0 {
                prop_assert_eq!(m.average_invoice_amount, Decimal::ZERO);
            } else {
                prop_assert_eq!(
                    m.average_invoice_amount,
                    m.total_invoiced / Decimal::from(m.invoice_count)
                );
            }
        }
    }
}
