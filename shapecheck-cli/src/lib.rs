//! # shapecheck-cli
//!
//! CLI library for validating JSON documents against schema descriptors.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`loader`] - Reading schema descriptors and data documents
//! - [`report`] - Checking documents and rendering results
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod loader;
pub mod report;

// Re-export main types for convenience
pub use config::{Config, ConfigManager, OutputConfig, OutputFormat};
pub use error::{CliError, CliResult};
pub use report::{DocumentReport, Reporter, check_documents};
