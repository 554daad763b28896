//! # Structured Logging Module
//!
//! Environment-aware structured logging. Human-readable output goes to
//! stderr so stdout carries nothing but sweep results; a JSON file layer is
//! added when `CHANNEL_BENCH_LOG_DIR` is set.

use crate::topology::RunReport;
use chrono::Utc;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_structured_logging() {
    LOGGER_GUARD.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_filter(build_filter(log_level));

        let (file_layer, guard, log_path) = match get_log_dir() {
            Some(log_dir) => {
                let pid = process::id();
                let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
                let log_filename = format!("{environment}.{pid}.{timestamp}.log");
                let log_path = log_dir.join(&log_filename);

                let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

                let layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(build_filter(log_level));

                (Some(layer), Some(guard), Some(log_path))
            }
            None => (None, None, None),
        };

        let subscriber = tracing_subscriber::registry().with(console).with(file_layer);

        // A subscriber installed by an embedding process stays in charge
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            log_file = %log_path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "none".to_string()),
            "structured logging initialized"
        );

        guard
    });
}

/// `RUST_LOG` wins over the environment-derived level
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("CHANNEL_BENCH_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_dir() -> Option<PathBuf> {
    std::env::var_os("CHANNEL_BENCH_LOG_DIR").map(PathBuf::from)
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "test" => "debug",
        "development" => "debug",
        "production" => "info",
        _ => "debug",
    }
}

/// Log the outcome of one pipeline run
pub fn log_run_report(report: &RunReport, first_delay_ms: u64, second_delay_ms: u64) {
    tracing::info!(
        topology = %report.topology,
        first_delay_ms,
        second_delay_ms,
        items_produced = report.items_produced,
        items_transformed = report.items_transformed,
        items_sunk = report.items_sunk,
        lanes = report.lanes_created,
        elapsed_ms = report.elapsed.as_millis() as u64,
        timestamp = %Utc::now().to_rfc3339(),
        "RUN_REPORT"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_repeated_initialization_is_harmless() {
        init_structured_logging();
        init_structured_logging();
        assert!(LOGGER_GUARD.get().is_some());
    }
}
