//! Analysis configuration
//!
//! Built-in defaults, optionally overridden by a TOML file. Command line flags
//! are applied on top by the CLI layer.
//!
//! ```toml
//! tickers = ["AAPL", "KO", "JPM"]
//! charts = ["Net Profit Margin", "Debt to Equity"]
//! charts_dir = "charts"
//! frequency = "annual"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::AnalyzerError;
use crate::ratios::Ratio;
use crate::statements::{Frequency, Ticker};

const DEFAULT_TICKERS: [&str; 3] = ["AAPL", "KO", "JPM"];
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Companies to analyze, in report order
    pub tickers: Vec<Ticker>,
    /// Ratio names to chart
    pub charts: Vec<String>,
    /// Where chart PNGs are written
    pub charts_dir: PathBuf,
    pub frequency: Frequency,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS
                .iter()
                .map(|t| Ticker(t.to_string()))
                .collect(),
            charts: vec![
                Ratio::NetProfitMargin.name().to_string(),
                Ratio::DebtToEquity.name().to_string(),
            ],
            charts_dir: PathBuf::from("charts"),
            frequency: Frequency::Annual,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)
            .map_err(|e| AnalyzerError::Config(e.to_string()))
            .context("Failed to parse configuration")?;
        Ok(config)
    }

    /// `<config_home>/finratios/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dir_spec::config_home().map(|dir| dir.join("finratios").join(CONFIG_FILENAME))
    }

    /// Load from `path`, or from the default location when it exists, or fall
    /// back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => p,
                None => {
                    debug!("No configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() {
            return Err(AnalyzerError::Config("no tickers configured".to_string()).into());
        }
        let mut seen = HashSet::new();
        for ticker in &self.tickers {
            if !seen.insert(ticker) {
                return Err(
                    AnalyzerError::Config(format!("ticker {} listed more than once", ticker)).into(),
                );
            }
        }
        Ok(())
    }
}
