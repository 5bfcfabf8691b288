//! Logging setup using tracing.
//!
//! The Connector crates emit `tracing` events. This module installs a
//! subscriber that prints them to stderr and forwards `log` crate records
//! to tracing as well.
//!
//! # Example
//!
//! ```ignore
//! use connector_core::logger::init_logging;
//! use tracing::info;
//!
//! // Initialize logging (call once at startup)
//! init_logging("shape_publisher");
//! info!("publisher started");
//! ```

use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize logging.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. `name` is
/// recorded in an `info` event once the subscriber is installed.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(name: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        // Set up log -> tracing bridge
        tracing_log::LogTracer::init().ok();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_ok();

        if installed {
            tracing::info!(application = name, "logging initialized");
        }
    });
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, trace, warn};
