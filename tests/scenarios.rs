//! End-to-end logger behavior through the public API.

use std::sync::Arc;

use portolan_log::{
    error_value, fields, log_info, Fields, LoggerConfig, LoggerSpec, RingBufferSink, Severity,
    TEST_LOGGER_NAME,
};
use serde_json::json;

/// Environment variable that no test sets, so the fallback level applies.
const UNSET_LEVEL_VAR: &str = "PORTOLAN_LOG_SCENARIO_LEVEL_UNSET";

#[test]
fn test_env_default_fatal_filters_info() -> anyhow::Result<()> {
    portolan_log::init_diagnostics();
    std::env::remove_var(UNSET_LEVEL_VAR);
    let ring = Arc::new(RingBufferSink::default());
    let logger = LoggerConfig::builder(TEST_LOGGER_NAME)
        .standard_serializers()
        .default_level_from_env(UNSET_LEVEL_VAR, Severity::Fatal)
        .default_stream(ring.clone())
        .build()?;

    logger.info("hello", fields! { a = 1 });
    assert!(ring.is_empty());

    logger.fatal("boom", fields! { a = 1 });
    let records = ring.records();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.level(), Severity::Fatal);
    assert_eq!(record.message(), "boom");
    assert_eq!(record.name(), "portolan-test");
    assert_eq!(record.field("a"), Some(&json!(1)));

    let raw: serde_json::Value = serde_json::from_str(&ring.lines()[0])?;
    assert_eq!(raw["level"], json!(60));
    Ok(())
}

#[test]
fn test_child_context_does_not_leak_to_parent() -> anyhow::Result<()> {
    portolan_log::init_diagnostics();
    let ring = Arc::new(RingBufferSink::default());
    let logger = LoggerConfig::builder("portolan")
        .stream(ring.clone(), Severity::Trace)
        .build()?
        .child(fields! { component = "vl2" });

    logger.child(fields! { reqId = "abc" }).warn("x", Fields::new());
    logger.warn("y", Fields::new());
    logger.info("z", Fields::new());

    let records = ring.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].field("component"), Some(&json!("vl2")));
    assert_eq!(records[0].field("reqId"), Some(&json!("abc")));
    for record in &records[1..] {
        assert_eq!(record.field("component"), Some(&json!("vl2")));
        assert!(record.field("reqId").is_none());
    }
    Ok(())
}

#[test]
fn test_warn_stream_never_sees_info() -> anyhow::Result<()> {
    let warn = Arc::new(RingBufferSink::default());
    let trace = Arc::new(RingBufferSink::default());
    let logger = LoggerConfig::builder("portolan")
        .stream(warn.clone(), Severity::Warn)
        .stream(trace.clone(), Severity::Trace)
        .build()?;

    for i in 0..10 {
        log_info!(logger, "tick", i = i);
    }
    logger.warn("done", Fields::new());

    assert_eq!(warn.len(), 1);
    assert_eq!(trace.len(), 11);
    Ok(())
}

#[test]
fn test_rust_error_through_err_serializer() -> anyhow::Result<()> {
    let ring = Arc::new(RingBufferSink::default());
    let logger = LoggerConfig::builder("portolan")
        .standard_serializers()
        .stream(ring.clone(), Severity::Error)
        .build()?;

    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "svp backend down");
    logger.error("lookup failed", fields! { err = error_value(&io_err), vnet = 4660 });

    let record = &ring.records()[0];
    let err = record.field("err").expect("err field");
    assert_eq!(err["message"], json!("svp backend down"));
    assert_eq!(err["name"], json!("Error"));
    assert_eq!(record.field("vnet"), Some(&json!(4660)));
    Ok(())
}

#[test]
fn test_file_logger_from_json_spec() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("portolan.log");
    let spec = LoggerSpec::from_json(&format!(
        r#"{{"name": "portolan", "streams": [{{"type": "file", "path": {}, "level": "debug"}}]}}"#,
        serde_json::to_string(&path)?
    ))?;

    {
        let logger = portolan_log::create_logger(&spec)?;
        logger.debug("one", fields! { n = 1 });
        logger.trace("skipped", Fields::new());
        logger.child(fields! { reqId = "r1" }).info("two", Fields::new());
        // Sinks are flushed and released when the last logger drops.
    }

    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let second = portolan_log::decode(lines[1])?;
    assert_eq!(second.message(), "two");
    assert_eq!(second.field("reqId"), Some(&json!("r1")));
    Ok(())
}
