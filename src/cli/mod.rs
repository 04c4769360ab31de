use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::statements::Frequency;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "finratios")]
#[command(
    version,
    about = "Financial ratio analyzer for listed companies"
)]
#[command(
    long_about = "Fetch income statements, balance sheets and cash flows from Yahoo Finance, compute liquidity, profitability and solvency ratios, chart them over time and compare companies."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch statements, compute ratios, render charts and the comparison table
    Analyze(AnalyzeArgs),

    /// Print the line items reported by one company
    Columns {
        /// Ticker symbol (e.g., AAPL)
        ticker: String,

        /// Reporting frequency
        #[arg(short, long, value_enum)]
        frequency: Option<Frequency>,

        /// Ignore cached statements
        #[arg(long)]
        refresh: bool,
    },

    /// List the ratios and the line items they need
    Ratios,
}

#[derive(Args, Debug, Default, Clone)]
pub struct AnalyzeArgs {
    /// Configuration file (TOML); defaults to <config dir>/finratios/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma-separated ticker symbols (e.g., AAPL,KO,JPM)
    #[arg(short, long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// Ratio to chart; repeat for several (e.g., --chart "Current Ratio")
    #[arg(long = "chart")]
    pub charts: Vec<String>,

    /// Directory for chart images
    #[arg(long)]
    pub charts_dir: Option<PathBuf>,

    /// Reporting frequency
    #[arg(short, long, value_enum)]
    pub frequency: Option<Frequency>,

    /// Ignore cached statements
    #[arg(long)]
    pub refresh: bool,
}
