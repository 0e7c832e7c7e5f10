//! Log subscriber setup.
//!
//! Repository functions emit `tracing` spans and `log` records; both end up in
//! the same formatter once [`init_logging`] has run.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. The filter comes from `RUST_LOG` and
/// defaults to `info`.
pub fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
    }
}
