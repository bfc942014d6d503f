//! Tracing initialisation
//!
//! Diagnostics go to stderr so stdout stays clean for the JSON package list.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG`; otherwise logs at `level`. Only the first call
/// takes effect.
pub fn init_tracing(level: Level) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(
      fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(level > Level::INFO)
        .without_time(),
    )
    .try_init()
    .ok();
}
