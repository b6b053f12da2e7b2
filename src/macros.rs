//! Logging macros.
//!
//! `fields!` builds a [`Fields`](crate::record::Fields) value. The leveled
//! macros check the level first, so field expressions are only evaluated
//! when some stream will take the record.

/// Build call-site fields: `fields! { a = 1, user = name }` or
/// `fields! { "req-id" => id }`.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::record::Fields::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {{
        let mut fields = $crate::record::Fields::new();
        $( fields.insert(stringify!($key), &$value); )+
        fields
    }};
    ($($key:literal => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::record::Fields::new();
        $( fields.insert($key, &$value); )+
        fields
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            #[allow(unused_mut)]
            let mut fields = $crate::record::Fields::new();
            $( fields.insert(stringify!($key), &$value); )*
            logger.log(level, &$msg, fields);
        }
    }};
}

/// Log a trace message with fields.
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::level::Severity::Trace, $msg $(, $key = $value)*)
    };
}

/// Log a debug message with fields.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::level::Severity::Debug, $msg $(, $key = $value)*)
    };
}

/// Log an info message with fields.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::level::Severity::Info, $msg $(, $key = $value)*)
    };
}

/// Log a warning message with fields.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::level::Severity::Warn, $msg $(, $key = $value)*)
    };
}

/// Log an error message with fields.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::level::Severity::Error, $msg $(, $key = $value)*)
    };
}

/// Log a fatal message with fields.
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_at!($logger, $crate::level::Severity::Fatal, $msg $(, $key = $value)*)
    };
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use serde_json::json;

    use crate::level::Severity;
    use crate::logger::LoggerConfig;
    use crate::sink::RingBufferSink;

    #[test]
    fn test_fields_macro_forms() {
        let empty = fields!();
        assert!(empty.is_empty());

        let f = fields! { a = 1, b = "two", };
        assert_eq!(f.get("a"), Some(&json!(1)));
        assert_eq!(f.get("b"), Some(&json!("two")));

        let f = fields! { "req-id" => "abc" };
        assert_eq!(f.get("req-id"), Some(&json!("abc")));
    }

    #[test]
    fn test_leveled_macros_skip_disabled_fields() {
        let ring = Arc::new(RingBufferSink::default());
        let logger = LoggerConfig::builder("macros")
            .stream(ring.clone(), Severity::Warn)
            .build()
            .unwrap();

        let evaluated = Cell::new(0);
        let costly = || {
            evaluated.set(evaluated.get() + 1);
            42
        };

        log_debug!(logger, "skipped", answer = costly());
        assert_eq!(evaluated.get(), 0);

        log_error!(logger, "kept", answer = costly(), who = "me");
        assert_eq!(evaluated.get(), 1);

        let message = format!("formatted {}", 1);
        log_fatal!(logger, message);

        let records = ring.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("answer"), Some(&json!(42)));
        assert_eq!(records[0].field("who"), Some(&json!("me")));
        assert_eq!(records[1].message(), "formatted 1");
    }
}
