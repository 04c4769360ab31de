//! Finratios - corporate financial statement analyzer
//!
//! This library fetches income statements, balance sheets and cash flows,
//! derives liquidity, profitability and solvency ratios, charts them over
//! time and compares averages across companies.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod ratios;
pub mod reports;
pub mod statements;
pub mod utils;

pub use analysis::{run_analysis, run_analysis_with_progress, AnalysisEvent, AnalysisReport};
pub use config::AnalysisConfig;
pub use error::AnalyzerError;
