#![forbid(unsafe_code)]

//! Subscriber setup for folio's `tracing` events.
//!
//! Components log under `folio.*` targets:
//!
//! | Target          | Emitted by                                  |
//! |-----------------|---------------------------------------------|
//! | `folio.nav`     | navigation resolver and navigator           |
//! | `folio.overlay` | overlay transitions                         |
//! | `folio.motion`  | choreography starts                         |
//! | `folio.scroll`  | progress trackers and in-view observers     |
//! | `folio.timer`   | timer scheduling, firing and supersession   |
//! | `folio.contact` | contact form delivery                       |
//! | `folio.events`  | listener registration                       |
//!
//! The filter comes from `FOLIO_LOG` (`EnvFilter` syntax), defaulting to
//! `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "FOLIO_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Compact,
    /// One JSON object per record.
    #[cfg(feature = "tracing-json")]
    Json,
}

/// A global subscriber was already installed.
#[derive(Debug, thiserror::Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingError(String);

/// Filter from `FOLIO_LOG`, or `info` when unset or unparseable.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a stderr subscriber filtered by [`env_filter`].
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    init_with_writer(format, env_filter(), std::io::stderr, true)
}

/// Install a subscriber writing through `writer`.
///
/// `terminal: false` drops the time column and ANSI colors, for sinks such
/// as the browser console that add their own.
pub fn init_with_writer<W>(
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
    terminal: bool,
) -> Result<(), LoggingError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(terminal)
        .with_writer(writer);
    let result = match (format, terminal) {
        (LogFormat::Compact, true) => builder.compact().try_init(),
        (LogFormat::Compact, false) => builder.compact().without_time().try_init(),
        #[cfg(feature = "tracing-json")]
        (LogFormat::Json, true) => builder.json().try_init(),
        #[cfg(feature = "tracing-json")]
        (LogFormat::Json, false) => builder.json().without_time().try_init(),
    };
    result.map_err(|e| LoggingError(e.to_string()))
}
