//! Invoicing domain module.
//!
//! The invoice here is a read-only snapshot handed over by storage; this crate
//! owns its shape and the tolerant decoding of its fields, nothing else.

pub mod invoice;
mod lenient;

pub use invoice::{Invoice, InvoiceId, InvoiceStatus};
