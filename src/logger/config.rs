//! Logger configuration.
//!
//! Two ways in:
//! - [`LoggerConfig::builder`] for code that already holds sinks and
//!   serializers,
//! - [`LoggerSpec`], a serde-deserializable description (JSON) whose sinks
//!   are opened by [`create_logger`].

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LoggerError, SerializationError};
use crate::level::{level_from_env, Severity, LEVEL_ENV_VAR};
use crate::serializers::SerializerRegistry;
use crate::sink::{FileSink, Sink, StderrSink, StdoutSink};

use super::facade::Logger;

/// Name used by the test-suite preset.
pub const TEST_LOGGER_NAME: &str = "portolan-test";

/// One configured output.
#[derive(Clone)]
pub struct StreamConfig {
    /// Identity used in diagnostics; must be unique when given.
    pub id: Option<String>,
    pub sink: Arc<dyn Sink>,
    /// `None` means the logger's default level.
    pub level: Option<Severity>,
}

/// Everything needed to construct a [`Logger`].
#[derive(Clone)]
pub struct LoggerConfig {
    pub name: String,
    pub serializers: Arc<SerializerRegistry>,
    pub streams: Vec<StreamConfig>,
    /// Threshold for streams without an explicit level. `None` reads
    /// `LOG_LEVEL`, falling back to `info`.
    pub default_level: Option<Severity>,
}

impl LoggerConfig {
    pub fn builder(name: &str) -> LoggerConfigBuilder {
        LoggerConfigBuilder {
            config: LoggerConfig {
                name: name.to_string(),
                serializers: Arc::new(SerializerRegistry::new()),
                streams: Vec::new(),
                default_level: None,
            },
        }
    }

    pub(crate) fn resolved_default_level(&self) -> Severity {
        self.default_level
            .unwrap_or_else(|| level_from_env(LEVEL_ENV_VAR, Severity::Info))
    }

    /// Checks name and stream identities.
    pub(crate) fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::Configuration(
                "logger name must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for stream in &self.streams {
            if let Some(id) = &stream.id {
                if !seen.insert(id.as_str()) {
                    return Err(LoggerError::DuplicateStream(id.clone()));
                }
            }
        }
        Ok(())
    }
}

pub struct LoggerConfigBuilder {
    config: LoggerConfig,
}

impl LoggerConfigBuilder {
    /// Use an existing registry, possibly shared with other loggers.
    pub fn serializers(mut self, registry: Arc<SerializerRegistry>) -> Self {
        self.config.serializers = registry;
        self
    }

    /// Replace the registry with one holding the standard serializers.
    pub fn standard_serializers(mut self) -> Self {
        self.config.serializers = Arc::new(SerializerRegistry::with_standard());
        self
    }

    pub fn serializer<F>(self, field: &str, serializer: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, SerializationError> + Send + Sync + 'static,
    {
        self.config.serializers.register(field, serializer);
        self
    }

    pub fn stream(mut self, sink: Arc<dyn Sink>, level: Severity) -> Self {
        self.config.streams.push(StreamConfig {
            id: None,
            sink,
            level: Some(level),
        });
        self
    }

    /// Stream at the logger's default level.
    pub fn default_stream(mut self, sink: Arc<dyn Sink>) -> Self {
        self.config.streams.push(StreamConfig {
            id: None,
            sink,
            level: None,
        });
        self
    }

    pub fn named_stream(mut self, id: &str, sink: Arc<dyn Sink>, level: Option<Severity>) -> Self {
        self.config.streams.push(StreamConfig {
            id: Some(id.to_string()),
            sink,
            level,
        });
        self
    }

    pub fn default_level(mut self, level: Severity) -> Self {
        self.config.default_level = Some(level);
        self
    }

    /// Default level from an environment variable, `fallback` when unset or
    /// unrecognized.
    pub fn default_level_from_env(mut self, var: &str, fallback: Severity) -> Self {
        self.config.default_level = Some(level_from_env(var, fallback));
        self
    }

    pub fn finish(self) -> LoggerConfig {
        self.config
    }

    pub fn build(self) -> Result<Logger, LoggerError> {
        Logger::new(self.config)
    }
}

/// Serializable logger description.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerSpec {
    pub name: String,
    /// Default level for streams without one; `LOG_LEVEL` or `info` if absent.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default = "default_true")]
    pub standard_serializers: bool,
    /// An empty list means one stderr stream at the default level.
    #[serde(default)]
    pub streams: Vec<StreamSpec>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(flatten)]
    pub target: SinkSpec,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SinkSpec {
    Stderr,
    Stdout,
    File { path: PathBuf },
}

impl SinkSpec {
    fn open(&self) -> Result<Arc<dyn Sink>, LoggerError> {
        match self {
            SinkSpec::Stderr => Ok(Arc::new(StderrSink::stderr())),
            SinkSpec::Stdout => Ok(Arc::new(StdoutSink::stdout())),
            SinkSpec::File { path } => {
                let sink = FileSink::open(path).map_err(|source| LoggerError::SinkOpen {
                    target: path.display().to_string(),
                    source,
                })?;
                Ok(Arc::new(sink))
            }
        }
    }
}

impl LoggerSpec {
    pub fn from_json(text: &str) -> Result<Self, LoggerError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn parse_level(raw: &Option<String>) -> Result<Option<Severity>, LoggerError> {
    raw.as_deref().map(str::parse::<Severity>).transpose()
}

/// Open every sink named in `spec` and build the logger.
///
/// Sinks are opened in order. If one fails, those already opened are
/// dropped (and so flushed and released) before the error is returned.
pub fn create_logger(spec: &LoggerSpec) -> Result<Logger, LoggerError> {
    let default_level = match parse_level(&spec.level)? {
        Some(level) => level,
        None => level_from_env(LEVEL_ENV_VAR, Severity::Info),
    };

    let mut builder = LoggerConfig::builder(&spec.name).default_level(default_level);
    if spec.standard_serializers {
        builder = builder.standard_serializers();
    }

    if spec.streams.is_empty() {
        builder = builder.default_stream(Arc::new(StderrSink::stderr()));
    }

    for stream in &spec.streams {
        let level = parse_level(&stream.level)?;
        let sink = stream.target.open()?;
        builder = match &stream.id {
            Some(id) => builder.named_stream(id, sink, level),
            None => match level {
                Some(level) => builder.stream(sink, level),
                None => builder.default_stream(sink),
            },
        };
    }

    builder.build()
}

/// The test-suite logger: `portolan-test`, standard serializers, one stderr
/// stream at `LOG_LEVEL` or `fatal`.
pub fn test_logger() -> Result<Logger, LoggerError> {
    LoggerConfig::builder(TEST_LOGGER_NAME)
        .standard_serializers()
        .default_level_from_env(LEVEL_ENV_VAR, Severity::Fatal)
        .default_stream(Arc::new(StderrSink::stderr()))
        .build()
}
