//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Report sections (aging breakdowns, summaries, periods) carry no identity:
/// two breakdowns with the same bucket amounts are the same breakdown. They are
/// built once and replaced, never edited in place, which is what lets a report
/// be recomputed deterministically from its parts.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Taxes {
///     sales_tax: Decimal,
///     other_taxes: Decimal,
/// }
///
/// impl ValueObject for Taxes {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
