use crate::error::{Error, Result};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const DEFAULT_LOG_FILTER: &str = "vnquant_utils=info";

/// Initialize logging for binaries and demos built on this crate.
///
/// Honours `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`]. Calling it twice
/// returns an error instead of panicking.
pub fn init_logger() -> Result<()> {
    let timer = ChronoUtc::rfc_3339();

    let format_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_timer(timer)
        .compact();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(format_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // The first call may race with other tests; only the second must fail.
        let _ = init_logger();
        assert!(matches!(init_logger(), Err(Error::Config(_))));
    }
}
