//! HTTP API: balance-sheet and receivables-aging reports.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
