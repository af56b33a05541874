use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use tallyerp_invoicing::Invoice;
use tallyerp_reporting::{ReportEngine, ReportPeriod, ReportRequest};

const STATUSES: [&str; 5] = ["paid", "pending", "overdue", "pending", "void"];

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

/// Deterministic spread over every status and aging window.
fn invoices(n: usize) -> Vec<Invoice> {
    (0..n)
        .map(|i| {
            let due = as_of() - Duration::days((i % 150) as i64 - 20);
            Invoice::new(
                format!("INV-{i}"),
                Decimal::new((i as i64 % 97) * 1_250 + 99, 2),
                STATUSES[i % STATUSES.len()],
                due - Duration::days(30),
                due,
            )
        })
        .collect()
}

fn bench_generate(c: &mut Criterion) {
    let engine = ReportEngine::default();
    let mut group = c.benchmark_group("balance_sheet");

    for size in [100usize, 1_000, 10_000] {
        let data = invoices(size);
        let mut request = ReportRequest::new(ReportPeriod::trailing_months(as_of(), 3), as_of());
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("aggregate", size), &data, |b, data| {
            b.iter(|| engine.generate(black_box(data), black_box(&request)))
        });

        request.include_projections = true;
        group.bench_with_input(BenchmarkId::new("with_projections", size), &data, |b, data| {
            b.iter(|| engine.generate(black_box(data), black_box(&request)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
