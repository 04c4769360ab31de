//! Financial ratio calculation.
//!
//! Income and balance statements are aligned on the periods they share, then
//! each ratio is computed only when every line item it needs is present. A
//! missing line item drops the whole ratio; a missing or zero value drops the
//! ratio for that period only.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyzerError;
use crate::statements::{FinancialTable, FiscalPeriod, StatementKind};

/// Ratios the calculator knows about, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ratio {
    CurrentRatio,
    NetProfitMargin,
    ReturnOnAssets,
    DebtToEquity,
}

impl Ratio {
    pub const ALL: [Ratio; 4] = [
        Ratio::CurrentRatio,
        Ratio::NetProfitMargin,
        Ratio::ReturnOnAssets,
        Ratio::DebtToEquity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Ratio::CurrentRatio => "Current Ratio",
            Ratio::NetProfitMargin => "Net Profit Margin",
            Ratio::ReturnOnAssets => "Return on Assets",
            Ratio::DebtToEquity => "Debt to Equity",
        }
    }

    /// Liquidity, profitability or solvency
    pub fn category(&self) -> &'static str {
        match self {
            Ratio::CurrentRatio => "Liquidity",
            Ratio::NetProfitMargin | Ratio::ReturnOnAssets => "Profitability",
            Ratio::DebtToEquity => "Solvency",
        }
    }

    pub fn spec(&self) -> RatioSpec {
        match self {
            Ratio::CurrentRatio => RatioSpec {
                ratio: *self,
                numerator: Operand::new(StatementKind::Balance, "Current Assets"),
                denominator: Operand::new(StatementKind::Balance, "Current Liabilities"),
            },
            Ratio::NetProfitMargin => RatioSpec {
                ratio: *self,
                numerator: Operand::new(StatementKind::Income, "Net Income"),
                denominator: Operand::new(StatementKind::Income, "Total Revenue"),
            },
            Ratio::ReturnOnAssets => RatioSpec {
                ratio: *self,
                numerator: Operand::new(StatementKind::Income, "Net Income"),
                denominator: Operand::new(StatementKind::Balance, "Total Assets"),
            },
            Ratio::DebtToEquity => RatioSpec {
                ratio: *self,
                numerator: Operand::new(
                    StatementKind::Balance,
                    "Total Liabilities Net Minority Interest",
                ),
                denominator: Operand::new(StatementKind::Balance, "Stockholders Equity"),
            },
        }
    }

    /// Chart file name: lower case, spaces replaced by underscores
    pub fn file_stem(&self) -> String {
        chart_file_stem(self.name())
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ratio {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Ratio::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(wanted) || r.file_stem() == wanted)
            .ok_or_else(|| AnalyzerError::Config(format!("unknown ratio '{}'", s)))
    }
}

/// `"Debt to Equity"` -> `"debt_to_equity"`
pub fn chart_file_stem(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// A line item in a specific statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub statement: StatementKind,
    pub column: &'static str,
}

impl Operand {
    const fn new(statement: StatementKind, column: &'static str) -> Self {
        Self { statement, column }
    }
}

/// Schema descriptor: which line items a ratio divides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioSpec {
    pub ratio: Ratio,
    pub numerator: Operand,
    pub denominator: Operand,
}

impl RatioSpec {
    /// Static presence check against the aligned tables
    pub fn is_satisfied_by(&self, income: &FinancialTable, balance: &FinancialTable) -> bool {
        [self.numerator, self.denominator]
            .iter()
            .all(|op| pick(op.statement, income, balance).is_some_and(|t| t.has_column(op.column)))
    }
}

fn pick<'a>(
    kind: StatementKind,
    income: &'a FinancialTable,
    balance: &'a FinancialTable,
) -> Option<&'a FinancialTable> {
    match kind {
        StatementKind::Income => Some(income),
        StatementKind::Balance => Some(balance),
        StatementKind::CashFlow => None,
    }
}

/// `num / den`, or `None` when an operand is absent, the denominator is zero,
/// or the result is not finite
pub fn quotient(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    let (num, den) = (num?, den?);
    if den == 0.0 {
        return None;
    }
    let q = num / den;
    q.is_finite().then_some(q)
}

/// Ratios of one company, indexed by the periods shared by its income and
/// balance statements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatioTable {
    periods: Vec<FiscalPeriod>,
    columns: BTreeMap<Ratio, Vec<Option<f64>>>,
}

impl RatioTable {
    pub fn periods(&self) -> &[FiscalPeriod] {
        &self.periods
    }

    pub fn ratios(&self) -> impl Iterator<Item = Ratio> + '_ {
        self.columns.keys().copied()
    }

    pub fn has(&self, ratio: Ratio) -> bool {
        self.columns.contains_key(&ratio)
    }

    pub fn values(&self, ratio: Ratio) -> Option<&[Option<f64>]> {
        self.columns.get(&ratio).map(|v| v.as_slice())
    }

    /// `(period, value)` pairs with absent values dropped
    pub fn series(&self, ratio: Ratio) -> Vec<(FiscalPeriod, f64)> {
        match self.columns.get(&ratio) {
            Some(values) => self
                .periods
                .iter()
                .zip(values)
                .filter_map(|(p, v)| v.map(|v| (*p, v)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Mean of the non-absent values; `None` if the ratio is missing or has no values
    pub fn mean(&self, ratio: Ratio) -> Option<f64> {
        let values: Vec<f64> = self.columns.get(&ratio)?.iter().flatten().copied().collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Periods where at least one ratio has a value, with their row of values
    pub fn non_empty_rows(&self) -> Vec<(FiscalPeriod, Vec<Option<f64>>)> {
        self.periods
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let row: Vec<Option<f64>> = self
                    .columns
                    .values()
                    .map(|col| col.get(i).copied().flatten())
                    .collect();
                (*p, row)
            })
            .filter(|(_, row)| row.iter().any(Option::is_some))
            .collect()
    }
}

/// Compute every ratio whose line items are present.
///
/// Both tables are first restricted to their common periods, in the order
/// they appear in `income`.
pub fn calculate_ratios(income: &FinancialTable, balance: &FinancialTable) -> RatioTable {
    let periods = income.common_periods(balance);
    let income = income.restrict_to(&periods);
    let balance = balance.restrict_to(&periods);

    let mut columns = BTreeMap::new();
    for ratio in Ratio::ALL {
        let spec = ratio.spec();
        if !spec.is_satisfied_by(&income, &balance) {
            continue;
        }
        let (Some(num), Some(den)) = (
            operand_values(&spec.numerator, &income, &balance),
            operand_values(&spec.denominator, &income, &balance),
        ) else {
            continue;
        };
        let values = num
            .iter()
            .zip(den)
            .map(|(n, d)| quotient(*n, *d))
            .collect();
        columns.insert(ratio, values);
    }

    RatioTable { periods, columns }
}

fn operand_values<'a>(
    op: &Operand,
    income: &'a FinancialTable,
    balance: &'a FinancialTable,
) -> Option<&'a [Option<f64>]> {
    pick(op.statement, income, balance)?.column(op.column)
}
