// Reports module - ratio charts and cross-company comparison

pub mod charts;
pub mod comparison;

pub use charts::{plot_ratio, PlotOutcome};
pub use comparison::{build_comparison_table, ComparisonTable, COMPARED_RATIOS};

use crate::ratios::RatioTable;
use crate::statements::Ticker;

/// Ratio table of one company, as consumed by the reporters
#[derive(Debug, Clone)]
pub struct CompanyRatios {
    pub ticker: Ticker,
    pub ratios: RatioTable,
}
