//! Stderr logging for the library and the binary.
//!
//! The filter comes from the `[logging]` table of `placemark.toml`, for
//! example `default = "warn"` plus `"placemark::bookmarks" = "debug"` under
//! `[logging.modules]`. A set `RUST_LOG` replaces it.

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// `HH:MM:SS.mmm` in local time.
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

fn filter_directives(config: &LoggingConfig) -> String {
    std::iter::once(config.default.clone())
        .chain(
            config
                .modules
                .iter()
                .map(|(module, level)| format!("{module}={level}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the stderr subscriber. Later calls do nothing.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

        let layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_timer(ClockTime)
            .with_writer(std::io::stderr)
            .with_filter(filter);

        tracing_subscriber::registry().with(layer).init();
    });
}

/// Info event tagged with a `[component]` prefix.
#[macro_export]
macro_rules! log_event {
    ($component:expr, $event:expr) => {
        tracing::info!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Like [`log_event!`] at debug level.
#[macro_export]
macro_rules! debug_event {
    ($component:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}
