//! The logger façade.
//!
//! A `Logger` owns a name, an immutable context and a list of shared
//! streams. Each leveled call checks every stream's threshold first; the
//! record is built and encoded at most once, and only if some stream will
//! take it.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::diagnostics::DiagContext;
use crate::error::{LoggerError, SerializationError, SinkError};
use crate::level::Severity;
use crate::record::{build, encode, Context, Fields};
use crate::serializers::SerializerRegistry;
use crate::sink::Sink;

use super::config::LoggerConfig;
use super::stream::Stream;

/// Structured logger.
///
/// Cheap to clone; clones and children share streams and the serializer
/// registry.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    context: Context,
    streams: Vec<Arc<Stream>>,
    registry: Arc<SerializerRegistry>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("context", self.context.as_map())
            .field("streams", &self.streams)
            .finish()
    }
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Result<Self, LoggerError> {
        config.validate()?;
        let default_level = config.resolved_default_level();

        let streams = config
            .streams
            .into_iter()
            .map(|s| {
                let level = s.level.unwrap_or(default_level);
                let stream = match s.id {
                    Some(id) => Stream::new(&id, s.sink, level),
                    None => Stream::from_sink(s.sink, level),
                };
                Arc::new(stream)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "{} LOGGER_CREATED streams={} default_level={} serializers={:?}",
            DiagContext::logger(&config.name),
            streams.len(),
            default_level,
            config.serializers.field_names()
        );

        Ok(Self {
            name: Arc::from(config.name.as_str()),
            context: Context::new(),
            streams,
            registry: config.serializers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn streams(&self) -> &[Arc<Stream>] {
        &self.streams
    }

    pub fn registry(&self) -> &Arc<SerializerRegistry> {
        &self.registry
    }

    /// Derive a logger whose records also carry `extra`.
    ///
    /// Registered serializers are applied to `extra` once, here.
    pub fn child(&self, extra: Fields) -> Logger {
        let diag = DiagContext::logger(&self.name);
        let serialized: Fields = extra
            .into_iter()
            .map(|(key, value)| {
                let value = self.registry.serialize_in(diag, &key, value);
                (key, value)
            })
            .collect();

        Logger {
            name: Arc::clone(&self.name),
            context: self.context.overlay(serialized),
            streams: self.streams.clone(),
            registry: Arc::clone(&self.registry),
        }
    }

    /// Emit one record to every stream whose threshold `level` meets.
    ///
    /// Never fails. Sink errors are counted on the stream and reported as
    /// diagnostics; the other streams still receive the record.
    pub fn log(&self, level: Severity, message: &str, fields: Fields) {
        let mut fields = Some(fields);
        let mut encoded: Option<Vec<u8>> = None;

        for stream in &self.streams {
            if !stream.passes(level) {
                continue;
            }
            let line = encoded.get_or_insert_with(|| {
                let record = build(
                    &self.context,
                    level,
                    &self.name,
                    message,
                    fields.take().unwrap_or_default(),
                    &self.registry,
                );
                encode(&record)
            });
            stream.deliver(line, &self.name);
        }
    }

    pub fn trace(&self, message: &str, fields: Fields) {
        self.log(Severity::Trace, message, fields);
    }

    pub fn debug(&self, message: &str, fields: Fields) {
        self.log(Severity::Debug, message, fields);
    }

    pub fn info(&self, message: &str, fields: Fields) {
        self.log(Severity::Info, message, fields);
    }

    pub fn warn(&self, message: &str, fields: Fields) {
        self.log(Severity::Warn, message, fields);
    }

    pub fn error(&self, message: &str, fields: Fields) {
        self.log(Severity::Error, message, fields);
    }

    pub fn fatal(&self, message: &str, fields: Fields) {
        self.log(Severity::Fatal, message, fields);
    }

    /// Whether any stream would accept a record at `level`.
    pub fn is_enabled(&self, level: Severity) -> bool {
        self.streams.iter().any(|s| s.passes(level))
    }

    /// Lowest threshold across streams.
    pub fn level(&self) -> Option<Severity> {
        self.streams.iter().map(|s| s.threshold()).min()
    }

    /// Set every stream's threshold. Loggers sharing the streams see it too.
    pub fn set_level(&self, level: Severity) {
        for stream in &self.streams {
            stream.set_threshold(level);
        }
    }

    /// Attach another stream to this logger handle.
    ///
    /// Only this handle and children derived from it afterwards write to the
    /// new stream. Existing clones and children keep the streams they had.
    pub fn add_stream(&mut self, stream: Arc<Stream>) -> Result<(), LoggerError> {
        if self.streams.iter().any(|s| s.id() == stream.id()) {
            return Err(LoggerError::DuplicateStream(stream.id().to_string()));
        }
        self.streams.push(stream);
        Ok(())
    }

    pub fn add_sink(&mut self, sink: Arc<dyn Sink>, level: Severity) -> Result<(), LoggerError> {
        self.add_stream(Arc::new(Stream::from_sink(sink, level)))
    }

    /// Register a serializer in the shared registry.
    pub fn add_serializer<F>(&self, field: &str, serializer: F)
    where
        F: Fn(&Value) -> Result<Value, SerializationError> + Send + Sync + 'static,
    {
        self.registry.register(field, serializer);
    }

    /// Flush every sink, returning the first error after trying them all.
    pub fn flush(&self) -> Result<(), SinkError> {
        self.each_sink(|sink| sink.flush())
    }

    /// Close every sink, returning the first error after trying them all.
    pub fn close(&self) -> Result<(), SinkError> {
        self.each_sink(|sink| sink.close())
    }

    fn each_sink<F>(&self, op: F) -> Result<(), SinkError>
    where
        F: Fn(&dyn Sink) -> Result<(), SinkError>,
    {
        let mut first_err = None;
        for stream in &self.streams {
            if let Err(e) = op(stream.sink().as_ref()) {
                log::warn!(
                    "{} SINK_OP_FAILED error={}",
                    DiagContext::logger(&self.name).stream(stream.id()),
                    e
                );
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
