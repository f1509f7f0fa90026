use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global fmt subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_logging(default_level: &str) {
    if !tracing::dispatcher::has_been_set() {
        let default_level = default_level.to_string();
        INIT.call_once(move || {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        });
    }
}
