//! Process-wide tracing/logging setup.

pub mod tracing;

pub use tracing::LogFormat;

/// Initialize tracing/logging from the environment (`RUST_LOG`, `LOG_FORMAT`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
