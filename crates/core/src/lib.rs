//! `tallyerp-core`: shared domain primitives.
//!
//! Pure building blocks only (no IO, no HTTP, no storage).

pub mod date;
pub mod error;
pub mod id;
pub mod value_object;

pub use date::{months_before, parse_calendar_date};
pub use error::{DomainError, DomainResult};
pub use id::TenantId;
pub use value_object::ValueObject;
