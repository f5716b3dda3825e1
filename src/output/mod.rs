//! Output module for exporting scrape results and reporting statistics
//!
//! This module handles:
//! - Writing results as pretty-printed JSON or flat CSV
//! - Naming export files by timestamp
//! - Printing session statistics

mod export;
pub mod stats;

pub use export::{default_export_path, export, flatten_report};
pub use stats::{format_statistics, print_statistics};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "unknown output format '{}' (expected json or csv)",
                other
            )),
        }
    }
}

/// Errors raised while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data cannot be written as CSV: {0}")]
    NotTabular(String),
}
