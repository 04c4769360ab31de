//! On-disk cache of fetched statements.
//!
//! Raw provider statements are stored as pretty JSON, one file per ticker, under
//! `<cache_home>/finratios/statements/<frequency>/`. Entries older than 24 hours
//! are refetched. Computed ratios are never cached.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{Frequency, StatementSource, Statements, Ticker};
use crate::error::AnalyzerError;

const CACHE_MAX_AGE_HOURS: i64 = 24;

pub fn get_statements_cache_dir(frequency: Frequency) -> Result<PathBuf> {
    let cache_dir = dir_spec::cache_home()
        .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?;

    Ok(cache_dir
        .join("finratios")
        .join("statements")
        .join(frequency.as_str()))
}

/// Whether the environment forbids network access
pub fn offline_mode() -> bool {
    std::env::var("FINRATIOS_OFFLINE").ok().as_deref() == Some("1")
}

/// Statement source with a 24-hour on-disk cache in front of another source
pub struct CachedSource<S> {
    inner: S,
    cache_dir: PathBuf,
    max_age: Duration,
    refresh: bool,
    offline: bool,
}

impl<S: StatementSource> CachedSource<S> {
    pub fn new(inner: S, cache_dir: PathBuf) -> Self {
        Self {
            inner,
            cache_dir,
            max_age: Duration::hours(CACHE_MAX_AGE_HOURS),
            refresh: false,
            offline: false,
        }
    }

    /// Ignore cached entries and always fetch (still writes the cache)
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Serve from cache only, regardless of entry age
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    fn entry_path(&self, ticker: &Ticker) -> PathBuf {
        self.cache_dir.join(format!("{}.json", ticker))
    }

    fn read_entry(&self, ticker: &Ticker) -> Result<Option<(Statements, DateTime<Utc>)>> {
        let path = self.entry_path(ticker);
        if !path.exists() {
            return Ok(None);
        }
        let modified: DateTime<Utc> = fs::metadata(&path)
            .and_then(|m| m.modified())
            .context("Failed to read cache entry metadata")?
            .into();
        let bytes = fs::read(&path).context("Failed to read cached statements")?;
        let statements: Statements =
            serde_json::from_slice(&bytes).context("Failed to parse cached statements")?;
        Ok(Some((statements, modified)))
    }

    fn write_entry(&self, ticker: &Ticker, statements: &Statements) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).context("Failed to create statements cache directory")?;
        let path = self.entry_path(ticker);
        let tmp_path = self.cache_dir.join(format!("{}.json.tmp", ticker));
        fs::write(&tmp_path, serde_json::to_vec_pretty(statements)?)
            .context("Failed to write statements cache file")?;
        fs::rename(&tmp_path, &path).context("Failed to finalize statements cache file")?;
        Ok(())
    }
}

impl<S: StatementSource> StatementSource for CachedSource<S> {
    async fn fetch(&self, ticker: &Ticker) -> Result<Statements> {
        if !self.refresh || self.offline {
            match self.read_entry(ticker) {
                Ok(Some((statements, modified))) => {
                    let age = Utc::now().signed_duration_since(modified);
                    if self.offline || age < self.max_age {
                        debug!(
                            "Using cached statements for {} (age: {}h)",
                            ticker,
                            age.num_hours()
                        );
                        return Ok(statements);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable cache entry for {}: {:#}", ticker, e),
            }
        }

        if self.offline {
            return Err(AnalyzerError::data_unavailable(
                ticker.as_str(),
                "offline mode and no cached statements",
            )
            .into());
        }

        info!("Fetching fresh statements for {}", ticker);
        let statements = self.inner.fetch(ticker).await?;

        if let Err(e) = self.write_entry(ticker, &statements) {
            warn!("Failed to cache statements for {}: {:#}", ticker, e);
        }
        Ok(statements)
    }
}
