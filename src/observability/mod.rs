//! Observability for sheetbase
//!
//! Structured logging through `tracing`. Every line carries a typed
//! [`Event`] in its `event` field so logs can be filtered by event name.
//!
//! # Usage
//!
//! ```ignore
//! use sheetbase::observability::{init_logging, Event};
//!
//! init_logging();
//! tracing::info!(event = %Event::BootStart, "starting");
//! ```

mod events;

pub use events::Event;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Install the global fmt subscriber.
///
/// Honors `RUST_LOG`. Logs go to stderr; stdout is reserved for command
/// output. Calling it more than once is harmless; later calls leave the
/// first subscriber in place.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
