//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Install a JSON subscriber writing to stderr.
///
/// `RUST_LOG` wins over `default_filter`. Stdout stays free for command
/// output. Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_init_is_a_no_op() {
        super::init("debug");
        super::init("info");
        tracing::info!("still logging after second init");
    }
}
