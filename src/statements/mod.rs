// Statements module - time-indexed financial tables and their sources

pub mod cache;
pub mod yahoo;

pub use cache::CachedSource;
pub use yahoo::YahooClient;

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::AnalyzerError;

/// Company identifier, e.g. `AAPL`. Always upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Ticker(pub(crate) String);

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AnalyzerError::Config("empty ticker symbol".to_string()).into());
        }
        if symbol.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(AnalyzerError::Config(format!("invalid ticker symbol '{}'", raw)).into());
        }
        Ok(Ticker(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ticker {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Ticker::parse(&value)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reporting period, identified by its period-end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiscalPeriod(NaiveDate);

impl FiscalPeriod {
    pub fn new(end_date: NaiveDate) -> Self {
        FiscalPeriod(end_date)
    }

    /// Period ending on December 31st of `year`
    pub fn year_end(year: i32) -> Self {
        // Dec 31 exists for every representable year
        FiscalPeriod(NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MIN))
    }

    /// Position on a continuous year axis (2023-06-30 -> ~2023.5), used for charting
    pub fn fractional_year(&self) -> f64 {
        let days_in_year = if NaiveDate::from_ymd_opt(self.0.year(), 2, 29).is_some() {
            366.0
        } else {
            365.0
        };
        self.0.year() as f64 + self.0.ordinal0() as f64 / days_in_year
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Reporting frequency requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Annual,
    Quarterly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Annual => "annual",
            Frequency::Quarterly => "quarterly",
        }
    }
}

/// The three statements every company reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Income,
    Balance,
    CashFlow,
}

impl StatementKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            StatementKind::Income => "Income Statement",
            StatementKind::Balance => "Balance Sheet",
            StatementKind::CashFlow => "Cash Flow",
        }
    }
}

/// One named line item, one value per period of the owning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A financial statement: rows are fiscal periods, columns are line items.
///
/// A column that is not present means the provider never reported that line
/// item; a present column may still hold `None` for individual periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialTable {
    periods: Vec<FiscalPeriod>,
    columns: Vec<LineItem>,
}

impl FinancialTable {
    pub fn new(periods: Vec<FiscalPeriod>) -> Self {
        Self {
            periods,
            columns: Vec::new(),
        }
    }

    /// Build a table from sparse `(period, value)` observations per line item.
    ///
    /// Rows are the union of all observed periods in chronological order.
    /// Line items without a single observation are skipped.
    pub fn from_observations<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<(FiscalPeriod, f64)>)>,
    {
        let items: Vec<(String, Vec<(FiscalPeriod, f64)>)> = items
            .into_iter()
            .filter(|(_, obs)| !obs.is_empty())
            .collect();

        let periods: Vec<FiscalPeriod> = items
            .iter()
            .flat_map(|(_, obs)| obs.iter().map(|(p, _)| *p))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut table = FinancialTable::new(periods);
        for (name, obs) in items {
            let values = table
                .periods
                .iter()
                .map(|p| obs.iter().find(|(op, _)| op == p).map(|(_, v)| *v))
                .collect();
            table.upsert(name, values);
        }
        table
    }

    /// Add a column, replacing any existing column with the same name
    pub fn insert_column(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.periods.len() {
            bail!(
                "column '{}' has {} values but the table has {} periods",
                name,
                values.len(),
                self.periods.len()
            );
        }
        self.upsert(name.to_string(), values);
        Ok(())
    }

    /// Builder-style `insert_column`
    pub fn with_column(mut self, name: &str, values: Vec<Option<f64>>) -> Result<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    fn upsert(&mut self, name: String, values: Vec<Option<f64>>) {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(LineItem { name, values }),
        }
    }

    pub fn periods(&self) -> &[FiscalPeriod] {
        &self.periods
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.columns.is_empty()
    }

    /// Periods present in both tables, in the order they appear in `self`
    pub fn common_periods(&self, other: &FinancialTable) -> Vec<FiscalPeriod> {
        let theirs: HashSet<&FiscalPeriod> = other.periods.iter().collect();
        let mut seen = HashSet::new();
        self.periods
            .iter()
            .filter(|p| theirs.contains(p) && seen.insert(**p))
            .copied()
            .collect()
    }

    /// Select the given periods (in the given order), keeping every column.
    /// Periods the table does not know produce absent values.
    pub fn restrict_to(&self, periods: &[FiscalPeriod]) -> FinancialTable {
        let rows: Vec<Option<usize>> = periods
            .iter()
            .map(|p| self.periods.iter().position(|own| own == p))
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|c| LineItem {
                name: c.name.clone(),
                values: rows
                    .iter()
                    .map(|row| row.and_then(|i| c.values.get(i).copied().flatten()))
                    .collect(),
            })
            .collect();

        FinancialTable {
            periods: periods.to_vec(),
            columns,
        }
    }
}

/// The three statements of one company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statements {
    pub income: FinancialTable,
    pub balance: FinancialTable,
    pub cash_flow: FinancialTable,
}

impl Statements {
    pub fn table(&self, kind: StatementKind) -> &FinancialTable {
        match kind {
            StatementKind::Income => &self.income,
            StatementKind::Balance => &self.balance,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.balance.is_empty() && self.cash_flow.is_empty()
    }
}

/// Anything that can produce the statements of a company
#[allow(async_fn_in_trait)]
pub trait StatementSource {
    async fn fetch(&self, ticker: &Ticker) -> Result<Statements>;
}

/// Convert a provider key to a display name: `NetIncome` -> `Net Income`,
/// `BasicEPS` -> `Basic EPS`, `EBITDA` -> `EBITDA`.
pub fn camel_to_title(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}
