use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tallyerp_core::{DomainError, DomainResult, months_before, parse_calendar_date};
use tallyerp_reporting::{
    AgingBalanceOverride, AgingBreakdown, AgingBucket, AssetOverrides, BreakdownOverride,
    CollectionRates, LiabilityOverrides, ReportPeriod, TaxesOverride,
};

// -------------------------
// Request DTOs
// -------------------------

/// Query string for the GET report endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub as_of: Option<String>,
}

/// POST body. Override sections stay as raw JSON so bad fields can be
/// skipped one by one instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheetRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub as_of: Option<String>,
    pub custom_assets: Option<Value>,
    pub custom_liabilities: Option<Value>,
    pub include_projections: Option<Value>,
    pub collection_rates: Option<Value>,
}

impl BalanceSheetRequest {
    /// Only a literal `true` turns projections on.
    pub fn wants_projections(&self) -> bool {
        matches!(self.include_projections, Some(Value::Bool(true)))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

/// `200 { "success": true, "data": ... }`
pub fn success<T: Serialize>(data: T) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(ApiSuccess {
            success: true,
            data,
        }),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArAgingItem {
    pub invoice_id: String,
    pub status: String,
    pub aging_bucket: AgingBucket,
    pub days_past_due: Option<i64>,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArAgingReport {
    pub period: ReportPeriod,
    pub as_of_date: NaiveDate,
    pub breakdown: AgingBreakdown,
    pub total: Decimal,
    pub items: Vec<ArAgingItem>,
}

// -------------------------
// Period resolution
// -------------------------

/// Period and as-of date for one report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub period: ReportPeriod,
    pub as_of: NaiveDate,
}

/// Missing or blank values take defaults: end = today, start = today minus
/// `lookback_months`, as-of = today. Present but unparseable values are
/// errors. A start after the end is passed through and simply matches no
/// invoices.
pub fn resolve_window(
    start_date: Option<&str>,
    end_date: Option<&str>,
    as_of: Option<&str>,
    today: NaiveDate,
    lookback_months: u32,
) -> DomainResult<ReportWindow> {
    let end = parse_optional_date("endDate", end_date)?.unwrap_or(today);
    let start = parse_optional_date("startDate", start_date)?
        .unwrap_or_else(|| months_before(today, lookback_months));
    let period = ReportPeriod::new(start, end);
    let as_of = parse_optional_date("asOf", as_of)?.unwrap_or(today);
    Ok(ReportWindow { period, as_of })
}

fn parse_optional_date(
    field: &'static str,
    raw: Option<&str>,
) -> DomainResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_calendar_date(s)
            .map(Some)
            .ok_or_else(|| DomainError::invalid_date(field, s)),
    }
}

// -------------------------
// Lenient override parsing
// -------------------------

/// Collects the paths of override fields that were present but unusable.
#[derive(Debug, Default)]
pub struct Ignored(pub Vec<String>);

impl Ignored {
    fn push(&mut self, path: impl Into<String>) {
        self.0.push(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// JSON numbers and numeric strings; everything else is `None`.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .ok()
            }
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn object<'a>(
    value: &'a Value,
    path: &str,
    ignored: &mut Ignored,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::Null => None,
        _ => {
            ignored.push(path);
            None
        }
    }
}

fn number_field(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
    ignored: &mut Ignored,
) -> Option<Decimal> {
    let value = map.get(key)?;
    if value.is_null() {
        return None;
    }
    let parsed = decimal_from_json(value);
    if parsed.is_none() {
        ignored.push(format!("{path}.{key}"));
    }
    parsed
}

fn breakdown_override(value: &Value, path: &str, ignored: &mut Ignored) -> BreakdownOverride {
    let mut out = BreakdownOverride::default();
    if let Some(map) = object(value, path, ignored) {
        for bucket in AgingBucket::ALL {
            if let Some(v) = number_field(map, bucket.as_str(), path, ignored) {
                out.set(bucket, v);
            }
        }
    }
    out
}

fn aging_balance_override(
    value: &Value,
    path: &str,
    ignored: &mut Ignored,
) -> Option<AgingBalanceOverride> {
    let map = object(value, path, ignored)?;
    let total = number_field(map, "total", path, ignored);
    let breakdown = map
        .get("breakdown")
        .map(|b| breakdown_override(b, &format!("{path}.breakdown"), ignored))
        .unwrap_or_default();

    let o = AgingBalanceOverride { total, breakdown };
    (o != AgingBalanceOverride::default()).then_some(o)
}

pub fn asset_overrides(value: Option<&Value>, ignored: &mut Ignored) -> AssetOverrides {
    let Some(map) = value.and_then(|v| object(v, "customAssets", ignored)) else {
        return AssetOverrides::default();
    };
    AssetOverrides {
        accounts_receivable: map.get("accountsReceivable").and_then(|v| {
            aging_balance_override(v, "customAssets.accountsReceivable", ignored)
        }),
        inventory: number_field(map, "inventory", "customAssets", ignored),
        prepaid_expenses: number_field(map, "prepaidExpenses", "customAssets", ignored),
    }
}

pub fn liability_overrides(value: Option<&Value>, ignored: &mut Ignored) -> LiabilityOverrides {
    let Some(map) = value.and_then(|v| object(v, "customLiabilities", ignored)) else {
        return LiabilityOverrides::default();
    };

    let taxes = map
        .get("taxes")
        .and_then(|v| object(v, "customLiabilities.taxes", ignored))
        .map(|t| TaxesOverride {
            sales_tax: number_field(t, "salesTax", "customLiabilities.taxes", ignored),
            other_taxes: number_field(t, "otherTaxes", "customLiabilities.taxes", ignored),
        })
        .filter(|t| t != &TaxesOverride::default());

    LiabilityOverrides {
        accounts_payable: map.get("accountsPayable").and_then(|v| {
            aging_balance_override(v, "customLiabilities.accountsPayable", ignored)
        }),
        taxes,
    }
}

/// Per-bucket rates layered over `base`. `None` when nothing usable was given.
pub fn collection_rates(
    value: Option<&Value>,
    base: CollectionRates,
    ignored: &mut Ignored,
) -> Option<CollectionRates> {
    let map = value.and_then(|v| object(v, "collectionRates", ignored))?;
    let mut rates = base;
    let mut changed = false;
    for bucket in AgingBucket::ALL {
        if let Some(rate) = number_field(map, bucket.as_str(), "collectionRates", ignored) {
            rates.set(bucket, rate);
            changed = true;
        }
    }
    changed.then_some(rates)
}
