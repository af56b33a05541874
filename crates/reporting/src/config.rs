//! Reporting assumptions.
//!
//! The balance-sheet lines that are not derived from invoices, and the
//! collection/cash-flow factors used by projections, are plain data here so
//! callers and tests can swap them. Every struct deserializes with per-field
//! defaults, so a partial JSON document only replaces what it names.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::aging::{AgingBalance, AgingBreakdown, AgingBucket};

/// Top-level configuration for the report engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportingConfig {
    pub defaults: BalanceSheetDefaults,
    pub projection: ProjectionAssumptions,
}

/// Pass-through balance-sheet lines used when the caller supplies none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheetDefaults {
    pub inventory: Decimal,
    pub prepaid_expenses: Decimal,
    pub accounts_payable: AgingBalance,
    pub sales_tax: Decimal,
    pub other_taxes: Decimal,
}

impl Default for BalanceSheetDefaults {
    fn default() -> Self {
        Self {
            inventory: dec!(150000),
            prepaid_expenses: dec!(25000),
            accounts_payable: AgingBalance::from_breakdown(AgingBreakdown {
                current: dec!(50000),
                overdue30: dec!(20000),
                overdue60: dec!(10000),
                overdue90_plus: dec!(5000),
            }),
            sales_tax: dec!(12000),
            other_taxes: dec!(8000),
        }
    }
}

/// Fraction of each aging bucket expected to be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionRates {
    pub current: Decimal,
    pub overdue30: Decimal,
    pub overdue60: Decimal,
    #[serde(rename = "overdue90Plus")]
    pub overdue90_plus: Decimal,
}

impl Default for CollectionRates {
    fn default() -> Self {
        Self {
            current: dec!(0.90),
            overdue30: dec!(0.75),
            overdue60: dec!(0.50),
            overdue90_plus: dec!(0.25),
        }
    }
}

impl CollectionRates {
    pub fn rate(&self, bucket: AgingBucket) -> Decimal {
        match bucket {
            AgingBucket::Current => self.current,
            AgingBucket::Overdue30 => self.overdue30,
            AgingBucket::Overdue60 => self.overdue60,
            AgingBucket::Overdue90Plus => self.overdue90_plus,
        }
    }

    pub fn set(&mut self, bucket: AgingBucket, rate: Decimal) {
        match bucket {
            AgingBucket::Current => self.current = rate,
            AgingBucket::Overdue30 => self.overdue30 = rate,
            AgingBucket::Overdue60 => self.overdue60 = rate,
            AgingBucket::Overdue90Plus => self.overdue90_plus = rate,
        }
    }
}

/// Weights applied when turning collections and payables into cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashflowAssumptions {
    /// Weight of `next60Days` collections in inflows.
    pub next60_weight: Decimal,
    /// Weight of `next90Days` collections in inflows.
    pub next90_weight: Decimal,
    /// Share of accounts payable assumed paid in the near term.
    pub payables_payment_rate: Decimal,
}

impl Default for CashflowAssumptions {
    fn default() -> Self {
        Self {
            next60_weight: dec!(0.8),
            next90_weight: dec!(0.6),
            payables_payment_rate: dec!(0.7),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionAssumptions {
    pub collection_rates: CollectionRates,
    pub cashflow: CashflowAssumptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_payables_total_matches_breakdown() {
        let d = BalanceSheetDefaults::default();
        assert_eq!(d.accounts_payable.total, d.accounts_payable.breakdown.sum());
        assert_eq!(d.accounts_payable.total, dec!(85000));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let cfg: ReportingConfig = serde_json::from_value(json!({
            "defaults": { "inventory": 1000 },
            "projection": { "collectionRates": { "overdue90Plus": 0.1 } }
        }))
        .unwrap();

        assert_eq!(cfg.defaults.inventory, dec!(1000));
        assert_eq!(cfg.defaults.prepaid_expenses, dec!(25000));
        assert_eq!(cfg.projection.collection_rates.overdue90_plus, dec!(0.1));
        assert_eq!(cfg.projection.collection_rates.current, dec!(0.90));
        assert_eq!(cfg.projection.cashflow, CashflowAssumptions::default());
    }

    #[test]
    fn rates_are_addressable_by_bucket() {
        let mut rates = CollectionRates::default();
        rates.set(AgingBucket::Overdue60, dec!(0.4));
        assert_eq!(rates.rate(AgingBucket::Overdue60), dec!(0.4));
        assert_eq!(rates.rate(AgingBucket::Current), dec!(0.90));
    }
}
