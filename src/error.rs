//! Error types for the dashboard library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for loading and rendering.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Error reading file {} for '{label}': {reason}", .path.display())]
    FileRead {
        label: String,
        path: PathBuf,
        reason: String,
    },

    #[error("No valid data files loaded. Please check file paths and formatting.")]
    NoData,

    #[error("Gene '{gene_id}' appears more than once in comparison '{comparison}'")]
    AmbiguousPivot { gene_id: String, comparison: String },
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
