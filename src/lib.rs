//! # Greenplug - Green-Energy Smart Plug Controller
//!
//! Greenplug samples NorthWestern Energy's published electricity-generation
//! time series, derives the green share of the current grid mix, and
//! reconciles a Sequematic smart-switch webhook so the plug is on exactly
//! when green generation covers the configured share of forecast load.
//!
//! ## Architecture
//!
//! The application follows a modular architecture with clear separation of concerns:
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `reading`: Provider time-series parsing into one consistent reading
//! - `policy`: Pure decision policy mapping a reading to a verdict
//! - `metrics`: Monitoring-metric records and the sink boundary
//! - `provider`: HTTP client for the generation feed
//! - `switch`: Sequematic webhook client and the reconciliation protocol
//! - `controller`: One-run orchestration

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod policy;
pub mod provider;
pub mod reading;
pub mod switch;

// Re-export commonly used types
pub use config::Config;
pub use controller::Controller;
pub use error::{GreenplugError, Result};
