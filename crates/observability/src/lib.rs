//! Process-wide logging setup shared by warden binaries.

/// Subscriber construction (filters, layers).
pub mod subscriber;

/// Initialize tracing/logging with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init("info");
}
