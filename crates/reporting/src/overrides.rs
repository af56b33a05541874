//! Caller-supplied partial overrides for the pass-through balance-sheet lines.
//!
//! Every field is optional. Unset fields keep the value already on the
//! report; they never reset to zero. Nested balances merge the same way, and
//! when a bucket changes without an explicit `total`, the total is re-derived
//! from the merged buckets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aging::{AgingBalance, AgingBreakdown, AgingBucket};
use crate::balance_sheet::{Assets, Liabilities, Taxes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakdownOverride {
    pub current: Option<Decimal>,
    pub overdue30: Option<Decimal>,
    pub overdue60: Option<Decimal>,
    #[serde(rename = "overdue90Plus")]
    pub overdue90_plus: Option<Decimal>,
}

impl BreakdownOverride {
    pub fn get(&self, bucket: AgingBucket) -> Option<Decimal> {
        match bucket {
            AgingBucket::Current => self.current,
            AgingBucket::Overdue30 => self.overdue30,
            AgingBucket::Overdue60 => self.overdue60,
            AgingBucket::Overdue90Plus => self.overdue90_plus,
        }
    }

    pub fn set(&mut self, bucket: AgingBucket, value: Decimal) {
        let slot = match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Overdue30 => &mut self.overdue30,
            AgingBucket::Overdue60 => &mut self.overdue60,
            AgingBucket::Overdue90Plus => &mut self.overdue90_plus,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        AgingBucket::ALL.iter().all(|b| self.get(*b).is_none())
    }

    pub fn apply(&self, base: &AgingBreakdown) -> AgingBreakdown {
        let mut merged = *base;
        for bucket in AgingBucket::ALL {
            if let Some(value) = self.get(bucket) {
                *merged.slot_mut(bucket) = value;
            }
        }
        merged
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgingBalanceOverride {
    pub total: Option<Decimal>,
    pub breakdown: BreakdownOverride,
}

impl AgingBalanceOverride {
    pub fn apply(&self, base: &AgingBalance) -> AgingBalance {
        let breakdown = self.breakdown.apply(&base.breakdown);
        let total = match self.total {
            Some(total) => total,
            None if self.breakdown.is_empty() => base.total,
            None => breakdown.sum(),
        };
        AgingBalance { total, breakdown }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxesOverride {
    pub sales_tax: Option<Decimal>,
    pub other_taxes: Option<Decimal>,
}

impl TaxesOverride {
    pub fn apply(&self, base: &Taxes) -> Taxes {
        Taxes {
            sales_tax: self.sales_tax.unwrap_or(base.sales_tax),
            other_taxes: self.other_taxes.unwrap_or(base.other_taxes),
        }
    }
}

/// `customAssets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetOverrides {
    pub accounts_receivable: Option<AgingBalanceOverride>,
    pub inventory: Option<Decimal>,
    pub prepaid_expenses: Option<Decimal>,
}

impl AssetOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, base: &Assets) -> Assets {
        Assets {
            accounts_receivable: self
                .accounts_receivable
                .map(|o| o.apply(&base.accounts_receivable))
                .unwrap_or(base.accounts_receivable),
            inventory: self.inventory.unwrap_or(base.inventory),
            prepaid_expenses: self.prepaid_expenses.unwrap_or(base.prepaid_expenses),
        }
    }
}

/// `customLiabilities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiabilityOverrides {
    pub accounts_payable: Option<AgingBalanceOverride>,
    pub taxes: Option<TaxesOverride>,
}

impl LiabilityOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, base: &Liabilities) -> Liabilities {
        Liabilities {
            accounts_payable: self
                .accounts_payable
                .map(|o| o.apply(&base.accounts_payable))
                .unwrap_or(base.accounts_payable),
            taxes: self
                .taxes
                .map(|o| o.apply(&base.taxes))
                .unwrap_or(base.taxes),
        }
    }
}
