//! Common logging configuration for Calculator Pro+

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
    /// Enable console output
    pub console: bool,
    /// Enable file output
    pub file: Option<String>,
    /// Log format (json, pretty, compact)
    pub format: LogFormat,
    /// Enable ANSI colors in console output
    pub ansi: bool,
    /// Include span events
    pub span_events: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: true,
            file: None,
            format: LogFormat::Pretty,
            ansi: true,
            span_events: false,
        }
    }
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| crate::Error::config(format!("Invalid log level: {}", e)))
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool, span_events: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let spans = if span_events {
        FmtSpan::FULL
    } else {
        FmtSpan::NONE
    };
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_span_events(spans);

    match format {
        LogFormat::Json => layer.json().with_thread_ids(true).boxed(),
        LogFormat::Pretty => layer.pretty().with_thread_ids(true).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// Initialize logging with the given configuration
///
/// Returns a guard that must be kept alive for file logging to work
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.console {
        let layer = fmt_layer(
            config.format,
            std::io::stdout,
            config.ansi,
            config.span_events,
        );
        layers.push(layer.with_filter(env_filter(&config.level)?).boxed());
    }

    if let Some(file_path) = &config.file {
        let path = Path::new(file_path);
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(directory)?;

        let file_appender = tracing_appender::rolling::daily(
            directory,
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("calcpro.log"),
        );
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let layer = fmt_layer(config.format, non_blocking, false, config.span_events);
        layers.push(layer.with_filter(env_filter(&config.level)?).boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| crate::Error::config(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

/// Initialize logging for tests
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// A builder for constructing log configuration
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl Default for LogConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    pub fn console(mut self, enable: bool) -> Self {
        self.config.console = enable;
        self
    }

    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.config.file = Some(path.into());
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn ansi(mut self, enable: bool) -> Self {
        self.config.ansi = enable;
        self
    }

    pub fn span_events(mut self, enable: bool) -> Self {
        self.config.span_events = enable;
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}
