//! Structured logging and tracing for Greenplug
//!
//! This module provides logging initialization driven by [`LoggingConfig`]
//! and a small component-scoped logger used by the HTTP collaborators.

use crate::config::LoggingConfig;
use crate::error::{GreenplugError, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Once;
use tracing::{Level, debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Keep the non-blocking worker guard alive for the entire process lifetime
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static INIT_ONCE: Once = Once::new();
static INIT_ERROR: OnceCell<String> = OnceCell::new();

/// Initialize logging system based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT_ONCE.call_once(|| {
        let init_result = (|| -> Result<()> {
            let level = parse_log_level(&config.level)?;
            let filter = build_env_filter(level);

            if config.file.is_empty() || should_use_console_only() {
                init_console_only_logging(filter, config.json_format, level);
                return Ok(());
            }

            init_file_logging(config, filter, level)?;
            Ok(())
        })();

        if let Err(e) = init_result {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    if let Some(err) = INIT_ERROR.get() {
        return Err(GreenplugError::config(err.clone()));
    }
    Ok(())
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("greenplug={},hyper=warn", level).into())
}

fn should_use_console_only() -> bool {
    cfg!(test) || std::env::var_os("GREENPLUG_DISABLE_FILE_LOG").is_some()
}

fn init_console_only_logging(filter: EnvFilter, json_format: bool, level: Level) {
    let console_layer = {
        let layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false);
        if json_format {
            layer
                .json()
                .with_filter(LevelFilter::from_level(level))
                .boxed()
        } else {
            layer.with_filter(LevelFilter::from_level(level)).boxed()
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}

fn init_file_logging(config: &LoggingConfig, filter: EnvFilter, level: Level) -> Result<()> {
    let file_appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("greenplug")
        .filename_suffix("log")
        .build({
            // If config.file is a file path, use its parent dir; otherwise treat as dir
            let p = Path::new(&config.file);
            if p.extension().is_some() {
                p.parent().unwrap_or(p)
            } else {
                p
            }
        })
        .map_err(|e| GreenplugError::io(format!("Failed to create log file appender: {}", e)))?;

    let (non_blocking_appender, guard) = non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let file_layer = {
        let layer = fmt::layer()
            .with_writer(non_blocking_appender)
            .with_ansi(false)
            .with_target(false);
        if config.json_format {
            layer
                .json()
                .with_filter(LevelFilter::from_level(level))
                .boxed()
        } else {
            layer.with_filter(LevelFilter::from_level(level)).boxed()
        }
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if config.console_output {
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_filter(LevelFilter::from_level(level));
        registry.with(console_layer).init();
    } else {
        registry.init();
    }

    Ok(())
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARNING" | "WARN" => Ok(Level::WARN),
        "ERROR" | "CRITICAL" => Ok(Level::ERROR),
        other => Err(GreenplugError::config(format!(
            "Unknown log level: {}",
            other
        ))),
    }
}

/// Structured logger scoped to a component
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    /// Log an info message with component context
    pub fn info(&self, message: &str) {
        info!(component = %self.component, "{}", message);
    }
    /// Log a warning message with component context
    pub fn warn(&self, message: &str) {
        warn!(component = %self.component, "{}", message);
    }
    /// Log an error message with component context
    pub fn error(&self, message: &str) {
        error!(component = %self.component, "{}", message);
    }
    /// Log a debug message with component context
    pub fn debug(&self, message: &str) {
        debug!(component = %self.component, "{}", message);
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger {
        component: component.to_string(),
    }
}
