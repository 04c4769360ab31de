//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use itertools::Itertools;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::ratios::{chart_file_stem, Ratio, RatioTable};
use crate::reports::{ComparisonTable, PlotOutcome};
use crate::statements::{FinancialTable, StatementKind, Statements, Ticker};
use crate::utils::format_ratio;

fn column_listing(ticker: &Ticker, kind: StatementKind, table: &FinancialTable) -> String {
    let heading = format!(
        "--- {} {} COLUMNS ---",
        ticker,
        kind.display_name().to_uppercase()
    );
    let names = if table.column_names().is_empty() {
        "(none)".dimmed().to_string()
    } else {
        table.column_names().iter().join(", ")
    };
    format!("\n{}\n{}\n", heading.bold(), names)
}

/// Balance sheet and income statement line items, in that order
pub fn format_statement_columns(ticker: &Ticker, statements: &Statements) -> String {
    let mut output = column_listing(ticker, StatementKind::Balance, &statements.balance);
    output.push_str(&column_listing(ticker, StatementKind::Income, &statements.income));
    output
}

/// All three statements' line items with their period ranges
pub fn format_all_columns(ticker: &Ticker, statements: &Statements) -> String {
    let mut output = String::new();
    for kind in [StatementKind::Income, StatementKind::Balance, StatementKind::CashFlow] {
        let table = statements.table(kind);
        output.push_str(&column_listing(ticker, kind, table));
        if let (Some(first), Some(last)) = (table.periods().first(), table.periods().last()) {
            output.push_str(&format!(
                "{} {} periods, {} to {}\n",
                "↳".bright_black(),
                table.periods().len(),
                first,
                last
            ));
        }
    }
    output
}

/// Ratio table rounded to three decimals. Periods where every ratio is absent
/// are left out.
pub fn format_ratio_table(ticker: &Ticker, ratios: &RatioTable) -> String {
    let rows = ratios.non_empty_rows();
    let names: Vec<&str> = ratios.ratios().map(|r| r.name()).collect();

    if names.is_empty() || rows.is_empty() {
        return format!(
            "\n{} No ratios available for {}\n",
            "ℹ".blue().bold(),
            ticker
        );
    }

    let mut builder = Builder::default();
    builder.push_record(std::iter::once("Period").chain(names.iter().copied()).map(String::from));
    for (period, values) in rows {
        builder.push_record(
            std::iter::once(period.to_string()).chain(values.into_iter().map(format_ratio)),
        );
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    format!("\n{} {} Ratios\n{}\n", "📊".cyan().bold(), ticker, table)
}

pub fn format_comparison_table(comparison: &ComparisonTable) -> String {
    let mut output = format!("\n{}\n", "--- Company Comparison (Averages) ---".bold());

    if comparison.rows().is_empty() {
        output.push_str("No companies analyzed\n");
        return output;
    }

    let mut builder = Builder::default();
    builder.push_record(std::iter::once("Ticker".to_string()).chain(comparison.column_names()));
    for row in comparison.rows() {
        builder.push_record(
            std::iter::once(row.ticker.to_string())
                .chain(row.averages.iter().copied().map(format_ratio)),
        );
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    output.push_str(&table.to_string());
    output.push('\n');
    output
}

pub fn format_plot_outcome(ratio_name: &str, outcome: &PlotOutcome) -> String {
    match outcome {
        PlotOutcome::Saved(path) => format!("{} Saved {}", "✓".green().bold(), path.display()),
        PlotOutcome::NoData => format!(
            "{} No data available to plot {}",
            "ℹ".yellow().bold(),
            ratio_name
        ),
    }
}

/// Known ratios with the line items they divide
pub fn format_ratio_catalog() -> String {
    #[derive(Tabled)]
    struct RatioRow {
        #[tabled(rename = "Ratio")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Numerator")]
        numerator: String,
        #[tabled(rename = "Denominator")]
        denominator: String,
        #[tabled(rename = "Chart File")]
        file: String,
    }

    let rows: Vec<RatioRow> = Ratio::ALL
        .iter()
        .map(|r| {
            let spec = r.spec();
            RatioRow {
                name: r.name().to_string(),
                category: r.category().to_string(),
                numerator: format!(
                    "{} ({})",
                    spec.numerator.column,
                    spec.numerator.statement.display_name()
                ),
                denominator: format!(
                    "{} ({})",
                    spec.denominator.column,
                    spec.denominator.statement.display_name()
                ),
                file: format!("{}.png", chart_file_stem(r.name())),
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.to_string()
}
