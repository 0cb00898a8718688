//! Host adapter for the conquest planning core.
//!
//! This crate wraps [`conquest_core`] in a process a game host can drive
//! over JSON lines on stdin/stdout:
//!
//! - **stdin**: one request envelope per line (snapshot plus query)
//! - **stdout**: one move per line
//! - **stderr**: logs (human-readable)
//!
//! See the [`protocol`] module for the request and move formats.
//!
//! # Example
//!
//! ```bash
//! # Run with default tunables
//! cargo run -p conquest_agent
//!
//! # Override tunables from a RON file, with debug logs
//! cargo run -p conquest_agent -- --config configs/agent.ron --verbose
//! ```

pub mod agent;
pub mod config;
pub mod protocol;
pub mod runner;

pub use agent::Agent;
pub use config::{config_from_ron_str, load_config, ConfigError};
pub use protocol::{Envelope, Move, Query};
pub use runner::{AgentRunner, RunnerError};
