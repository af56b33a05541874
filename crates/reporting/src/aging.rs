//! Aging Classifier.
//!
//! Assigns each invoice to one status total and, for receivables, to exactly
//! one aging bucket relative to an as-of date.
//!
//! `pending` and `overdue` invoices use different threshold tables. A pending
//! invoice stays `current` for up to 30 days past its due date (a grace
//! window); an invoice already flagged `overdue` never lands in `current` and
//! moves through the buckets 30 days earlier. Both tables are kept as named
//! constants so the difference stays visible.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tallyerp_core::ValueObject;
use tallyerp_invoicing::{Invoice, InvoiceStatus};

/// Time-since-due class of a receivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AgingBucket {
    Current,
    Overdue30,
    Overdue60,
    Overdue90Plus,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 4] = [
        AgingBucket::Current,
        AgingBucket::Overdue30,
        AgingBucket::Overdue60,
        AgingBucket::Overdue90Plus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgingBucket::Current => "current",
            AgingBucket::Overdue30 => "overdue30",
            AgingBucket::Overdue60 => "overdue60",
            AgingBucket::Overdue90Plus => "overdue90Plus",
        }
    }
}

/// Status total an invoice contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusBucket {
    Paid,
    Pending,
    Overdue,
    /// Status outside `paid | pending | overdue`. Counted, never bucketed.
    Unclassified,
}

/// Upper-inclusive day windows, checked in order; anything past the last
/// window falls into `beyond`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgingSchedule {
    windows: &'static [(i64, AgingBucket)],
    beyond: AgingBucket,
}

impl AgingSchedule {
    pub const fn new(windows: &'static [(i64, AgingBucket)], beyond: AgingBucket) -> Self {
        Self { windows, beyond }
    }

    pub fn bucket_for(&self, days_past_due: i64) -> AgingBucket {
        self.windows
            .iter()
            .find(|(upper, _)| days_past_due <= *upper)
            .map(|(_, bucket)| *bucket)
            .unwrap_or(self.beyond)
    }
}

/// `pending`: ≤30 current, 31–60 overdue30, 61–90 overdue60, >90 overdue90Plus.
pub const PENDING_SCHEDULE: AgingSchedule = AgingSchedule::new(
    &[
        (30, AgingBucket::Current),
        (60, AgingBucket::Overdue30),
        (90, AgingBucket::Overdue60),
    ],
    AgingBucket::Overdue90Plus,
);

/// `overdue`: ≤30 overdue30, 31–60 overdue60, >60 overdue90Plus.
pub const OVERDUE_SCHEDULE: AgingSchedule = AgingSchedule::new(
    &[(30, AgingBucket::Overdue30), (60, AgingBucket::Overdue60)],
    AgingBucket::Overdue90Plus,
);

/// Result of classifying one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusBucket,
    /// `Some` only for pending and overdue invoices.
    pub aging: Option<AgingBucket>,
    pub amount: Decimal,
    /// `None` when the due date is missing or unreadable.
    pub days_past_due: Option<i64>,
}

/// Classify an invoice against `as_of`.
///
/// An invoice without a readable due date is aged as if it fell due on
/// `as_of` (zero days past due): pending ones stay `current`, overdue ones land
/// in `overdue30`.
pub fn classify(invoice: &Invoice, as_of: NaiveDate) -> Classification {
    let days_past_due = invoice.days_past_due(as_of);
    let days = days_past_due.unwrap_or(0);

    let (status, aging) = match &invoice.status {
        InvoiceStatus::Paid => (StatusBucket::Paid, None),
        InvoiceStatus::Pending => (
            StatusBucket::Pending,
            Some(PENDING_SCHEDULE.bucket_for(days)),
        ),
        InvoiceStatus::Overdue => (
            StatusBucket::Overdue,
            Some(OVERDUE_SCHEDULE.bucket_for(days)),
        ),
        InvoiceStatus::Other(_) => (StatusBucket::Unclassified, None),
    };

    Classification {
        status,
        aging,
        amount: invoice.amount(),
        days_past_due,
    }
}

/// Amounts per aging bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingBreakdown {
    pub current: Decimal,
    pub overdue30: Decimal,
    pub overdue60: Decimal,
    #[serde(rename = "overdue90Plus")]
    pub overdue90_plus: Decimal,
}

impl ValueObject for AgingBreakdown {}

impl AgingBreakdown {
    pub fn get(&self, bucket: AgingBucket) -> Decimal {
        match bucket {
            AgingBucket::Current => self.current,
            AgingBucket::Overdue30 => self.overdue30,
            AgingBucket::Overdue60 => self.overdue60,
            AgingBucket::Overdue90Plus => self.overdue90_plus,
        }
    }

    pub fn slot_mut(&mut self, bucket: AgingBucket) -> &mut Decimal {
        match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Overdue30 => &mut self.overdue30,
            AgingBucket::Overdue60 => &mut self.overdue60,
            AgingBucket::Overdue90Plus => &mut self.overdue90_plus,
        }
    }

    /// Saturates at `Decimal::MAX`/`MIN` instead of overflowing.
    pub fn add(&mut self, bucket: AgingBucket, amount: Decimal) {
        let slot = self.slot_mut(bucket);
        *slot = slot.saturating_add(amount);
    }

    pub fn sum(&self) -> Decimal {
        AgingBucket::ALL
            .iter()
            .fold(Decimal::ZERO, |acc, b| acc.saturating_add(self.get(*b)))
    }
}

/// A balance line with its aging split (receivables or payables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingBalance {
    pub total: Decimal,
    pub breakdown: AgingBreakdown,
}

impl ValueObject for AgingBalance {}

impl AgingBalance {
    /// Balance whose total is the sum of its buckets.
    pub fn from_breakdown(breakdown: AgingBreakdown) -> Self {
        Self {
            total: breakdown.sum(),
            breakdown,
        }
    }
}
