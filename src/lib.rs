//! Discrete-time battery energy-storage cluster environments for policy training.

/// TOML-based scenario configuration and preset definitions.
pub mod config;
/// Two-agent and trace-driven simulation environments.
pub mod env;
/// Per-step episode telemetry and CSV export.
pub mod telemetry;
