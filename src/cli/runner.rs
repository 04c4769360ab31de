use anyhow::Result;

use crate::cli::AnalyzeArgs;
use crate::config::AnalysisConfig;
use crate::statements::Ticker;

/// Build the effective configuration: file (or defaults), then command line
/// flags on top. Flags that were not given leave the file value untouched.
pub fn resolve_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::load(args.config.as_deref())?;

    if !args.tickers.is_empty() {
        config.tickers = args
            .tickers
            .iter()
            .map(|t| Ticker::parse(t))
            .collect::<Result<Vec<_>>>()?;
    }
    if !args.charts.is_empty() {
        config.charts = args.charts.clone();
    }
    if let Some(dir) = &args.charts_dir {
        config.charts_dir = dir.clone();
    }
    if let Some(frequency) = args.frequency {
        config.frequency = frequency;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::Frequency;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tickers = [\"MSFT\"]\ncharts_dir = \"from-file\"\n").unwrap();

        let args = AnalyzeArgs {
            config: Some(path),
            tickers: vec!["ko".to_string(), "jpm".to_string()],
            frequency: Some(Frequency::Quarterly),
            ..Default::default()
        };
        let config = resolve_config(&args).unwrap();

        let tickers: Vec<&str> = config.tickers.iter().map(|t| t.as_str()).collect();
        assert_eq!(tickers, vec!["KO", "JPM"]);
        assert_eq!(config.charts_dir, PathBuf::from("from-file"));
        assert_eq!(config.frequency, Frequency::Quarterly);
        assert_eq!(config.charts, vec!["Net Profit Margin", "Debt to Equity"]);
    }

    #[test]
    fn test_duplicate_tickers_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let args = AnalyzeArgs {
            config: Some(path),
            tickers: vec!["KO".to_string(), "ko".to_string()],
            ..Default::default()
        };
        assert!(resolve_config(&args).is_err());
    }
}
