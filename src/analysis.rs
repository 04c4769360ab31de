//! Analysis pipeline: fetch → ratios → reports.
//!
//! Companies are processed one at a time, in configuration order. Every
//! company is fetched and its ratios computed before any chart is rendered.
//! The first fetch failure aborts the run and discards what was accumulated.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::ratios::{calculate_ratios, RatioTable};
use crate::reports::{build_comparison_table, plot_ratio, CompanyRatios, ComparisonTable, PlotOutcome};
use crate::statements::{StatementSource, Statements, Ticker};

/// Everything known about one analyzed company
#[derive(Debug, Clone)]
pub struct CompanyAnalysis {
    pub ticker: Ticker,
    pub statements: Statements,
    pub ratios: RatioTable,
}

/// Progress notifications, emitted in pipeline order
#[derive(Debug)]
pub enum AnalysisEvent<'a> {
    /// A company's statements were fetched and its ratios computed
    CompanyAnalyzed(&'a CompanyAnalysis),
    /// A chart request finished
    ChartRendered {
        ratio_name: &'a str,
        outcome: &'a PlotOutcome,
    },
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub companies: Vec<CompanyAnalysis>,
    pub charts: Vec<(String, PlotOutcome)>,
    pub comparison: ComparisonTable,
}

impl AnalysisReport {
    pub fn company(&self, ticker: &Ticker) -> Option<&CompanyAnalysis> {
        self.companies.iter().find(|c| &c.ticker == ticker)
    }
}

pub async fn run_analysis<S: StatementSource>(
    config: &AnalysisConfig,
    source: &S,
) -> Result<AnalysisReport> {
    run_analysis_with_progress(config, source, |_ev| {}).await
}

/// Run the full pipeline, reporting progress through `on_event`
pub async fn run_analysis_with_progress<S, F>(
    config: &AnalysisConfig,
    source: &S,
    mut on_event: F,
) -> Result<AnalysisReport>
where
    S: StatementSource,
    F: FnMut(AnalysisEvent<'_>),
{
    config.validate()?;

    let mut companies = Vec::with_capacity(config.tickers.len());
    for ticker in &config.tickers {
        let statements = source
            .fetch(ticker)
            .await
            .with_context(|| format!("Failed to fetch statements for {}", ticker))?;
        let ratios = calculate_ratios(&statements.income, &statements.balance);
        info!(
            "{}: {} ratios over {} periods",
            ticker,
            ratios.ratios().count(),
            ratios.periods().len()
        );

        let company = CompanyAnalysis {
            ticker: ticker.clone(),
            statements,
            ratios,
        };
        on_event(AnalysisEvent::CompanyAnalyzed(&company));
        companies.push(company);
    }

    let ratio_tables: Vec<CompanyRatios> = companies
        .iter()
        .map(|c| CompanyRatios {
            ticker: c.ticker.clone(),
            ratios: c.ratios.clone(),
        })
        .collect();

    let mut charts = Vec::with_capacity(config.charts.len());
    for ratio_name in &config.charts {
        let outcome = plot_ratio(&ratio_tables, ratio_name, &config.charts_dir)?;
        on_event(AnalysisEvent::ChartRendered {
            ratio_name,
            outcome: &outcome,
        });
        charts.push((ratio_name.clone(), outcome));
    }

    let comparison = build_comparison_table(&ratio_tables);

    Ok(AnalysisReport {
        companies,
        charts,
        comparison,
    })
}
