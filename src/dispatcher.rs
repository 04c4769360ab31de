//! Command dispatcher that routes parsed clap commands to their handlers.
//!
//! Handlers own the presentation; the library modules only compute.

use anyhow::Result;
use tracing::info;

use crate::analysis::{run_analysis_with_progress, AnalysisEvent};
use crate::cli::formatters::{
    format_all_columns, format_comparison_table, format_plot_outcome, format_ratio_catalog,
    format_ratio_table, format_statement_columns,
};
use crate::cli::runner::resolve_config;
use crate::cli::{AnalyzeArgs, Commands};
use crate::statements::cache::{get_statements_cache_dir, offline_mode};
use crate::statements::{CachedSource, Frequency, StatementSource, Ticker, YahooClient};

/// Route a parsed command to its handler; no command means `analyze` with defaults
pub async fn dispatch_command(command: Option<Commands>) -> Result<()> {
    match command {
        None => dispatch_analyze(&AnalyzeArgs::default()).await,
        Some(Commands::Analyze(args)) => dispatch_analyze(&args).await,
        Some(Commands::Columns {
            ticker,
            frequency,
            refresh,
        }) => dispatch_columns(&ticker, frequency.unwrap_or_default(), refresh).await,
        Some(Commands::Ratios) => {
            println!("{}", format_ratio_catalog());
            Ok(())
        }
    }
}

fn build_source(frequency: Frequency, refresh: bool) -> Result<CachedSource<YahooClient>> {
    let client = YahooClient::new(frequency)?;
    let cache_dir = get_statements_cache_dir(frequency)?;
    Ok(CachedSource::new(client, cache_dir)
        .refresh(refresh)
        .offline(offline_mode()))
}

async fn dispatch_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = resolve_config(args)?;
    info!(
        "Analyzing {} companies ({})",
        config.tickers.len(),
        config.frequency.as_str()
    );

    let source = build_source(config.frequency, args.refresh)?;

    let report = run_analysis_with_progress(&config, &source, |event| match event {
        AnalysisEvent::CompanyAnalyzed(company) => {
            print!(
                "{}",
                format_statement_columns(&company.ticker, &company.statements)
            );
            print!("{}", format_ratio_table(&company.ticker, &company.ratios));
        }
        AnalysisEvent::ChartRendered {
            ratio_name,
            outcome,
        } => {
            println!("{}", format_plot_outcome(ratio_name, outcome));
        }
    })
    .await?;

    print!("{}", format_comparison_table(&report.comparison));
    Ok(())
}

async fn dispatch_columns(ticker: &str, frequency: Frequency, refresh: bool) -> Result<()> {
    let ticker = Ticker::parse(ticker)?;
    let source = build_source(frequency, refresh)?;
    let statements = source.fetch(&ticker).await?;

    print!("{}", format_all_columns(&ticker, &statements));
    Ok(())
}
