//! Tolerant field decoders for invoice snapshots.
//!
//! Storage hands us whatever the upstream forms saved. A bad amount or date
//! must degrade to a defined fallback instead of rejecting the whole snapshot.

use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use tallyerp_core::parse_calendar_date;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(Decimal),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Other(IgnoredAny),
}

/// Numbers and numeric strings decode; anything else becomes `None`.
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(n)) => Some(n),
        Some(RawAmount::Text(s)) => Decimal::from_str(s.trim()).ok(),
        Some(RawAmount::Other(_)) | None => None,
    })
}

/// ISO dates (plain or RFC 3339) decode; anything else becomes `None`.
pub(crate) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDate>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDate::Text(s)) => parse_calendar_date(&s),
        Some(RawDate::Other(_)) | None => None,
    })
}
