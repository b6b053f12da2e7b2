//! Subject prefix for internal diagnostics.

use std::fmt;

/// What a diagnostic is about: the logger, the stream and the record field
/// involved, each only when known.
///
/// Renders as `[logger=..] [stream=..] [field=..]`, omitting absent parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagContext<'a> {
    logger: Option<&'a str>,
    stream: Option<&'a str>,
    field: Option<&'a str>,
}

impl<'a> DiagContext<'a> {
    pub fn logger(name: &'a str) -> Self {
        Self {
            logger: Some(name),
            ..Self::default()
        }
    }

    pub fn stream(self, id: &'a str) -> Self {
        Self {
            stream: Some(id),
            ..self
        }
    }

    pub fn field(self, key: &'a str) -> Self {
        Self {
            field: Some(key),
            ..self
        }
    }
}

impl fmt::Display for DiagContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("logger", self.logger),
            ("stream", self.stream),
            ("field", self.field),
        ];
        let mut first = true;
        for (label, value) in parts {
            if let Some(value) = value {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "[{}={}]", label, value)?;
                first = false;
            }
        }
        Ok(())
    }
}
