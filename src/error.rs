//! Error handling for finratios
//!
//! Defines the error taxonomy of the analyzer and establishes a unified
//! Result type using anyhow for context chaining and error propagation.
//!
//! Missing line items and degenerate divisions are not errors: they are
//! handled by presence checks and by absent ratio values.

use thiserror::Error;

/// Core error types for the analysis pipeline
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("chart error: {0}")]
    Chart(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    pub fn data_unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        AnalyzerError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for analyzer operations
pub type Result<T> = anyhow::Result<T>;
