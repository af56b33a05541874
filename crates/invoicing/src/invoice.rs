use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Opaque invoice identifier as assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub String);

impl InvoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invoice status as recorded upstream.
///
/// Only `paid`, `pending` and `overdue` carry meaning for reporting. Any other
/// value (drafts, cancellations, statuses added later elsewhere) is kept
/// verbatim in `Other` so it can still be counted and surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Other(s) => s,
        }
    }

    /// True for statuses that are still owed to us.
    pub fn is_receivable(&self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Overdue)
    }
}

impl From<String> for InvoiceStatus {
    fn from(value: String) -> Self {
        // Exact match: "Paid" or "PAID" are not the same status upstream.
        match value.as_str() {
            "paid" => InvoiceStatus::Paid,
            "pending" => InvoiceStatus::Pending,
            "overdue" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Other(value),
        }
    }
}

impl From<&str> for InvoiceStatus {
    fn from(value: &str) -> Self {
        InvoiceStatus::from(value.to_string())
    }
}

impl From<InvoiceStatus> for String {
    fn from(value: InvoiceStatus) -> Self {
        match value {
            InvoiceStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice snapshot consumed by reporting.
///
/// Fields mirror what storage returns. `due_date` earlier than `date` is legal
/// and not validated; unreadable amounts and dates decode to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_amount: Option<Decimal>,
    pub status: InvoiceStatus,
    /// Issue date.
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub due_date: Option<NaiveDate>,
}

impl Invoice {
    pub fn new(
        id: impl Into<String>,
        total_amount: Decimal,
        status: impl Into<InvoiceStatus>,
        date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: InvoiceId::new(id),
            total_amount: Some(total_amount),
            status: status.into(),
            date: Some(date),
            due_date: Some(due_date),
        }
    }

    /// Amount used for every total; a missing amount counts as zero.
    pub fn amount(&self) -> Decimal {
        self.total_amount.unwrap_or(Decimal::ZERO)
    }

    /// Whole days between `due_date` and `as_of` (negative when not yet due).
    ///
    /// `None` when the due date is missing or was unreadable.
    pub fn days_past_due(&self, as_of: NaiveDate) -> Option<i64> {
        self.due_date
            .map(|due| as_of.signed_duration_since(due).num_days())
    }

    /// True if the issue date falls inside `[start, end]`.
    pub fn issued_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.date.is_some_and(|d| d >= start && d <= end)
    }
}
