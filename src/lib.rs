//! # promcheck
//!
//! A monitoring plugin for Prometheus. It pulls point-in-time state from a
//! Prometheus server (alerting rules, instant or range queries, the health
//! and readiness endpoints) and reduces it to one Nagios/Icinga compatible
//! verdict: a severity, human readable text and performance data.
//!
//! ## Core Features
//!
//! - **Alert checks**: firing/pending/inactive rules mapped to CRITICAL/WARNING/OK,
//!   with name, group, exclude-pattern and problems-only filters
//! - **Query checks**: every returned series classified against warning and
//!   critical range thresholds (`10`, `10:`, `~:10`, `@10:20`)
//! - **Health checks**: `/-/healthy` and `/-/ready`, optionally with build information
//! - **Stable output**: deterministic summary, item lines and perfdata for a given input
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promcheck::client::PrometheusClient;
//! use promcheck::config::ConnectionConfig;
//! use promcheck::evaluation::{AlertOptions, Evaluator};
//!
//! # async fn demo() -> Result<(), promcheck::ProbeError> {
//! let client = PrometheusClient::from_config(&ConnectionConfig::default())?;
//! let report = Evaluator::new(client)
//!     .evaluate_alerts(&AlertOptions::default())
//!     .await?;
//! println!("{report}");
//! std::process::exit(report.exit_code());
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`core`] - Severity model, error types, constants and the backend trait
//! - [`evaluation`] - Threshold parsing, rule/sample/health classifiers and the evaluator
//! - [`format`] - Perfdata tokens, aggregation and report rendering
//! - [`client`] - `reqwest` implementation of the backend trait
//! - [`config`] - Connection settings from file, environment and flags
//! - [`cli`] - Command-line interface

/// Command-line interface and argument parsing
pub mod cli;
/// HTTP client for the Prometheus API
pub mod client;
/// Connection settings loading and validation
pub mod config;
/// Core types, errors, constants and traits
pub mod core;
/// Classification of alerts, query samples and health probes
pub mod evaluation;
/// Perfdata and report rendering
pub mod format;

// Re-export core functionality for easy access
pub use crate::core::*;
pub use evaluation::{Evaluator, Threshold};
pub use format::{Aggregator, Perfdata, Report};
