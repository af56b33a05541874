//! Infrastructure layer: where invoice snapshots come from.
//!
//! Storage proper is an external collaborator. This crate defines the seam
//! ([`InvoiceSource`]) and a tenant-isolated in-memory implementation that can
//! be seeded from a JSON snapshot file.

pub mod read_model;
pub mod snapshot;
pub mod source;

pub use read_model::InMemoryInvoiceStore;
pub use source::{InvoiceSource, InvoiceSourceError};
