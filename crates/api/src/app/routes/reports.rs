use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    routing::get,
    Json, Router,
};
use chrono::Utc;

use tallyerp_reporting::{classify, AgingBreakdown, ReportRequest};

use crate::app::dto::{self, ReportWindow};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/balance-sheet", get(get_balance_sheet).post(post_balance_sheet))
        .route("/ar-aging", get(get_ar_aging))
}

fn window(
    services: &AppServices,
    start: Option<&str>,
    end: Option<&str>,
    as_of: Option<&str>,
) -> Result<ReportWindow, axum::response::Response> {
    let today = Utc::now().date_naive();
    dto::resolve_window(start, end, as_of, today, services.default_lookback_months())
        .map_err(errors::domain_error_to_response)
}

async fn run_report(
    services: &AppServices,
    tenant: TenantContext,
    request: ReportRequest,
) -> axum::response::Response {
    let invoices = match services
        .fetch_invoices(tenant.tenant_id(), &request.period)
        .await
    {
        Ok(v) => v,
        Err(e) => return errors::source_error_to_response(e),
    };

    let report = services.engine().generate(&invoices, &request);
    tracing::info!(
        tenant_id = %tenant.tenant_id(),
        start = %request.period.start_date,
        end = %request.period.end_date,
        invoices = invoices.len(),
        projections = request.include_projections,
        "balance sheet generated"
    );
    dto::success(report)
}

pub async fn get_balance_sheet(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    query: Result<Query<dto::ReportQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let w = match window(
        &services,
        q.start_date.as_deref(),
        q.end_date.as_deref(),
        q.as_of.as_deref(),
    ) {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    run_report(&services, tenant, ReportRequest::new(w.period, w.as_of)).await
}

pub async fn post_balance_sheet(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<dto::BalanceSheetRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let w = match window(
        &services,
        body.start_date.as_deref(),
        body.end_date.as_deref(),
        body.as_of.as_deref(),
    ) {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    let mut ignored = dto::Ignored::default();
    let mut request = ReportRequest::new(w.period, w.as_of);
    request.custom_assets = dto::asset_overrides(body.custom_assets.as_ref(), &mut ignored);
    request.custom_liabilities =
        dto::liability_overrides(body.custom_liabilities.as_ref(), &mut ignored);
    request.include_projections = body.wants_projections();
    request.collection_rates = dto::collection_rates(
        body.collection_rates.as_ref(),
        services.collection_rates(),
        &mut ignored,
    );

    if !ignored.is_empty() {
        tracing::warn!(
            tenant_id = %tenant.tenant_id(),
            fields = ?ignored.0,
            "ignored invalid override fields"
        );
    }

    run_report(&services, tenant, request).await
}

/// Open receivables with their aging bucket, most overdue first.
pub async fn get_ar_aging(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    query: Result<Query<dto::ReportQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let w = match window(
        &services,
        q.start_date.as_deref(),
        q.end_date.as_deref(),
        q.as_of.as_deref(),
    ) {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    let invoices = match services.fetch_invoices(tenant.tenant_id(), &w.period).await {
        Ok(v) => v,
        Err(e) => return errors::source_error_to_response(e),
    };

    let mut breakdown = AgingBreakdown::default();
    let mut items = Vec::new();
    for invoice in &invoices {
        let c = classify(invoice, w.as_of);
        let Some(bucket) = c.aging else {
            continue;
        };
        breakdown.add(bucket, c.amount);
        items.push(dto::ArAgingItem {
            invoice_id: invoice.id.as_str().to_string(),
            status: invoice.status.as_str().to_string(),
            aging_bucket: bucket,
            days_past_due: c.days_past_due,
            amount: c.amount,
        });
    }
    items.sort_by(|a, b| {
        b.aging_bucket
            .cmp(&a.aging_bucket)
            .then_with(|| b.days_past_due.cmp(&a.days_past_due))
            .then_with(|| a.invoice_id.cmp(&b.invoice_id))
    });

    dto::success(dto::ArAgingReport {
        period: w.period,
        as_of_date: w.as_of,
        total: breakdown.sum(),
        breakdown,
        items,
    })
}
