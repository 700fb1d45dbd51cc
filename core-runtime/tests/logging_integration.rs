//! Integration tests for logging system

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{default_filter, init_logging, LogFormat, LoggingConfig};

#[derive(Default)]
struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for RecordingSink {
    async fn log(&self, entry: LogEntry) -> BridgeResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Json);
}

#[test]
fn test_default_filter_quiets_dependencies() {
    let filter = default_filter(LogLevel::Trace);
    for dep in ["h2=warn", "hyper=warn", "reqwest=warn", "sqlx=warn"] {
        assert!(filter.contains(dep), "missing {}", dep);
    }
    assert!(filter.contains("core_service=trace"));
}

// Global subscriber: only one test in this binary may install it.
#[test]
fn test_init_logging_mirrors_to_sink_and_rejects_second_init() {
    let sink = Arc::new(RecordingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Info)
        .with_logger_sink(sink.clone());

    init_logging(config.clone()).unwrap();

    tracing::info!(target: "core_sync", book = "Ruth", "Download requested");
    tracing::debug!(target: "core_sync", "filtered by level");

    {
        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Download requested");
        assert_eq!(entries[0].fields.get("book"), Some(&"Ruth".to_string()));
    }

    assert!(init_logging(config).is_err());
}
