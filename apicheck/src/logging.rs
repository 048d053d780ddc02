use std::sync::Once;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "apicheck=info";

static INITIALIZE_LOGGING: Once = Once::new();

/// Installs a fmt subscriber that writes through the test harness.
///
/// `RUST_LOG` overrides the default `apicheck=info` filter. Safe to call from
/// every test; only the first call has an effect.
pub fn init_test_logging() {
    INITIALIZE_LOGGING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
