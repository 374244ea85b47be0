//! Subscriber construction for the `<time> | <LEVEL> | <target> | <message>` line format.
//!
//! [`LoggingConfig`] is a plain value: build it once at process entry and call
//! [`LoggingConfig::init`], or hand [`LoggingConfig::subscriber_with_writer`] to
//! `tracing::subscriber::with_default` to get an isolated logger.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("global logger already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

fn default_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Minimum severity: `trace`, `debug`, `info`, `warn`, `error` or `off`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Extra `EnvFilter` directives layered over `level`, e.g. `screener_documents=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            filter: None,
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            filter: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidLevel`] if `level` is not a recognised severity.
    pub fn level_filter(&self) -> Result<LevelFilter, LoggingError> {
        self.level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| LoggingError::InvalidLevel(self.level.clone()))
    }

    /// # Errors
    ///
    /// Returns an error if the level or the filter directives do not parse.
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        let builder = EnvFilter::builder().with_default_directive(self.level_filter()?.into());
        Ok(builder.parse(self.filter.as_deref().unwrap_or_default().trim())?)
    }

    /// Build a subscriber that writes to `writer` without installing it anywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the level or the filter directives do not parse.
    pub fn subscriber_with_writer<W>(
        &self,
        writer: W,
    ) -> Result<impl Subscriber + Send + Sync + use<W>, LoggingError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = self.env_filter()?;
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .event_format(PipeFormat::new());
        Ok(tracing_subscriber::registry().with(filter).with(fmt_layer))
    }

    /// Stderr subscriber, not yet installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the level or the filter directives do not parse.
    pub fn subscriber(&self) -> Result<impl Subscriber + Send + Sync + use<>, LoggingError> {
        self.subscriber_with_writer(std::io::stderr)
    }

    /// Install the stderr subscriber as the process-wide default.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::AlreadyInitialized`] if a global subscriber is already set, so
    /// a second call never stacks handlers.
    pub fn init(&self) -> Result<(), LoggingError> {
        self.subscriber()?.try_init()?;
        Ok(())
    }
}

/// Install process-wide logging at `level`. Call once at startup.
///
/// # Errors
///
/// See [`LoggingConfig::init`].
pub fn setup_logging(level: &str) -> Result<(), LoggingError> {
    LoggingConfig::with_level(level).init()
}

/// Event formatter producing `<time> | <LEVEL:8> | <target> | <message> <fields>`.
#[derive(Debug, Clone, Default)]
pub struct PipeFormat<T = SystemTime> {
    timer: T,
}

impl PipeFormat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> PipeFormat<T> {
    #[must_use]
    pub fn with_timer<T2>(self, timer: T2) -> PipeFormat<T2> {
        PipeFormat { timer }
    }
}

impl<S, N, T> FormatEvent<S, N> for PipeFormat<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatTime,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        self.timer.format_time(&mut writer)?;
        write!(
            writer,
            " | {:<8} | {} | ",
            meta.level().as_str(),
            meta.target()
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
