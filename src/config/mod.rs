//! Configuration module for webglean
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webglean::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webglean.toml")).unwrap();
//! println!("Requests per minute: {}", config.scraper.requests_per_minute);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{BrowserConfig, CacheConfig, Config, EngineKind, OutputConfig, ScraperConfig};

pub use parser::{load_config, parse_config};
pub use validation::validate;
