//! Configuration module for Img-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the one environment override the engine honors (`MAX_WORKERS`).
//!
//! # Example
//!
//! ```no_run
//! use img_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Worker pool size: {}", config.engine.max_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, EngineConfig, SiteConfig, DEFAULT_MAX_WORKERS};

// Re-export parser functions
pub use parser::{load_config, resolve_max_workers};
