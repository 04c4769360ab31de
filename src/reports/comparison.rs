use crate::ratios::Ratio;
use crate::statements::Ticker;

use super::CompanyRatios;

/// Ratios averaged in the comparison table. Other computed ratios are
/// intentionally left out.
pub const COMPARED_RATIOS: [Ratio; 2] = [Ratio::NetProfitMargin, Ratio::DebtToEquity];

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub ticker: Ticker,
    /// One cell per table column; `None` when the company lacks the ratio
    pub averages: Vec<Option<f64>>,
}

/// Per-company averages of the compared ratios
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    columns: Vec<Ratio>,
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn ratios(&self) -> &[Ratio] {
        &self.columns
    }

    /// `"Avg <ratio name>"` per column
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|r| format!("Avg {}", r.name()))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names().iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn average(&self, ticker: &Ticker, ratio: Ratio) -> Option<f64> {
        let col = self.columns.iter().position(|r| *r == ratio)?;
        self.rows
            .iter()
            .find(|row| &row.ticker == ticker)
            .and_then(|row| row.averages.get(col).copied().flatten())
    }
}

/// Average each compared ratio per company, ignoring absent values.
///
/// Every company gets a row. A column exists once at least one company has the
/// ratio; companies without it get an absent cell, never zero.
pub fn build_comparison_table(companies: &[CompanyRatios]) -> ComparisonTable {
    let columns: Vec<Ratio> = COMPARED_RATIOS
        .into_iter()
        .filter(|ratio| companies.iter().any(|c| c.ratios.has(*ratio)))
        .collect();

    let rows = companies
        .iter()
        .map(|c| ComparisonRow {
            ticker: c.ticker.clone(),
            averages: columns.iter().map(|r| c.ratios.mean(*r)).collect(),
        })
        .collect();

    ComparisonTable { columns, rows }
}
