//! Tenant-isolated invoice snapshot storage.

pub mod invoice_store;

pub use invoice_store::InMemoryInvoiceStore;
