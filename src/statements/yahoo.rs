use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{
    camel_to_title, FinancialTable, FiscalPeriod, Frequency, StatementKind, StatementSource,
    Statements, Ticker,
};
use crate::error::AnalyzerError;

const TIMESERIES_BASE_URL: &str =
    "https://query2.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries";

/// Earliest period requested (August 1985)
const PERIOD1: i64 = 493_590_046;

const INCOME_KEYS: &[&str] = &[
    "TotalRevenue",
    "OperatingRevenue",
    "CostOfRevenue",
    "GrossProfit",
    "OperatingExpense",
    "SellingGeneralAndAdministration",
    "ResearchAndDevelopment",
    "OperatingIncome",
    "NetInterestIncome",
    "InterestExpense",
    "InterestIncome",
    "OtherIncomeExpense",
    "PretaxIncome",
    "TaxProvision",
    "NetIncomeCommonStockholders",
    "NetIncome",
    "NetIncomeContinuousOperations",
    "DilutedEPS",
    "BasicEPS",
    "DilutedAverageShares",
    "BasicAverageShares",
    "TotalExpenses",
    "NormalizedIncome",
    "EBIT",
    "EBITDA",
    "NormalizedEBITDA",
];

const BALANCE_KEYS: &[&str] = &[
    "TotalAssets",
    "CurrentAssets",
    "CashAndCashEquivalents",
    "CashCashEquivalentsAndShortTermInvestments",
    "Receivables",
    "AccountsReceivable",
    "Inventory",
    "OtherCurrentAssets",
    "TotalNonCurrentAssets",
    "NetPPE",
    "GoodwillAndOtherIntangibleAssets",
    "InvestmentsAndAdvances",
    "TotalLiabilitiesNetMinorityInterest",
    "CurrentLiabilities",
    "AccountsPayable",
    "CurrentDebt",
    "LongTermDebt",
    "TotalNonCurrentLiabilitiesNetMinorityInterest",
    "TotalDebt",
    "NetDebt",
    "StockholdersEquity",
    "CommonStockEquity",
    "TotalEquityGrossMinorityInterest",
    "RetainedEarnings",
    "WorkingCapital",
    "InvestedCapital",
    "TangibleBookValue",
    "TotalCapitalization",
    "ShareIssued",
    "OrdinarySharesNumber",
];

const CASH_FLOW_KEYS: &[&str] = &[
    "OperatingCashFlow",
    "NetIncomeFromContinuingOperations",
    "DepreciationAndAmortization",
    "StockBasedCompensation",
    "ChangeInWorkingCapital",
    "InvestingCashFlow",
    "CapitalExpenditure",
    "FinancingCashFlow",
    "IssuanceOfDebt",
    "RepaymentOfDebt",
    "RepurchaseOfCapitalStock",
    "CashDividendsPaid",
    "ChangesInCash",
    "BeginningCashPosition",
    "EndCashPosition",
    "FreeCashFlow",
];

/// Yahoo Finance fundamentals-timeseries response
#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    timeseries: TimeseriesBody,
}

#[derive(Debug, Deserialize)]
struct TimeseriesBody {
    result: Option<Vec<TimeseriesResult>>,
    error: Option<YahooError>,
}

/// One series per requested type; the data lives under a key equal to the type name
#[derive(Debug, Deserialize)]
struct TimeseriesResult {
    meta: TimeseriesMeta,
    #[serde(flatten)]
    series: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesMeta {
    #[serde(rename = "type")]
    kind: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DataPoint {
    #[serde(rename = "asOfDate")]
    as_of_date: String,
    #[serde(rename = "reportedValue")]
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

fn keys_for(kind: StatementKind) -> &'static [&'static str] {
    match kind {
        StatementKind::Income => INCOME_KEYS,
        StatementKind::Balance => BALANCE_KEYS,
        StatementKind::CashFlow => CASH_FLOW_KEYS,
    }
}

/// Statement fetcher backed by Yahoo Finance
pub struct YahooClient {
    client: Client,
    frequency: Frequency,
}

impl YahooClient {
    pub fn new(frequency: Frequency) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; FinratiosBot/1.0)")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client, frequency })
    }

    /// Timeseries URL for one statement. The symbol is percent-encoded, both as
    /// a path segment and as a query value.
    fn timeseries_url(&self, ticker: &Ticker, kind: StatementKind) -> Result<Url> {
        let prefix = self.frequency.as_str();
        let types = keys_for(kind)
            .iter()
            .map(|k| format!("{}{}", prefix, k))
            .collect::<Vec<_>>()
            .join(",");

        let mut url = Url::parse(TIMESERIES_BASE_URL).context("Invalid Yahoo Finance base URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Yahoo Finance base URL cannot take path segments"))?
            .push(ticker.as_str());
        url.query_pairs_mut()
            .append_pair("symbol", ticker.as_str())
            .append_pair("type", &types)
            .append_pair("period1", &PERIOD1.to_string())
            .append_pair("period2", &Utc::now().timestamp().to_string());
        Ok(url)
    }

    async fn fetch_statement(&self, ticker: &Ticker, kind: StatementKind) -> Result<FinancialTable> {
        let url = self.timeseries_url(ticker, kind)?;
        debug!("Requesting {} for {}", kind.display_name(), ticker);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AnalyzerError::data_unavailable(ticker.as_str(), e.to_string()))
            .context("Failed to send request to Yahoo Finance")?;

        if !response.status().is_success() {
            return Err(AnalyzerError::data_unavailable(
                ticker.as_str(),
                format!("Yahoo Finance returned error status: {}", response.status()),
            )
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalyzerError::data_unavailable(ticker.as_str(), e.to_string()))?;

        parse_timeseries(&body, self.frequency, kind)
            .map_err(|e| AnalyzerError::data_unavailable(ticker.as_str(), format!("{:#}", e)).into())
    }
}

impl StatementSource for YahooClient {
    async fn fetch(&self, ticker: &Ticker) -> Result<Statements> {
        info!(
            "Fetching {} statements for {} from Yahoo Finance",
            self.frequency.as_str(),
            ticker
        );

        let statements = Statements {
            income: self.fetch_statement(ticker, StatementKind::Income).await?,
            balance: self.fetch_statement(ticker, StatementKind::Balance).await?,
            cash_flow: self.fetch_statement(ticker, StatementKind::CashFlow).await?,
        };

        if statements.is_empty() {
            return Err(AnalyzerError::data_unavailable(
                ticker.as_str(),
                "no financial statements returned (unknown ticker?)",
            )
            .into());
        }

        debug!(
            "Fetched {} income, {} balance, {} cash flow periods for {}",
            statements.income.periods().len(),
            statements.balance.periods().len(),
            statements.cash_flow.periods().len(),
            ticker
        );
        Ok(statements)
    }
}

/// Parse a timeseries payload into a statement table.
///
/// Columns follow the statement's key order; keys the provider did not report
/// (or reported without any value) produce no column.
fn parse_timeseries(body: &str, frequency: Frequency, kind: StatementKind) -> Result<FinancialTable> {
    let data: TimeseriesResponse =
        serde_json::from_str(body).context("Failed to parse Yahoo Finance response")?;

    if let Some(error) = data.timeseries.error {
        return Err(anyhow!(
            "Yahoo Finance API error: {} - {}",
            error.code,
            error.description
        ));
    }

    let mut results = data.timeseries.result.unwrap_or_default();
    let prefix = frequency.as_str();

    let mut observations: Vec<(String, Vec<(FiscalPeriod, f64)>)> = Vec::new();
    for key in keys_for(kind) {
        let type_name = format!("{}{}", prefix, key);
        let Some(pos) = results
            .iter()
            .position(|r| r.meta.kind.iter().any(|t| t == &type_name))
        else {
            continue;
        };
        let mut result = results.swap_remove(pos);

        let points: Vec<Option<DataPoint>> = match result.series.remove(&type_name) {
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("Malformed series {}", type_name))?,
            None => continue,
        };

        let mut obs = Vec::new();
        for point in points.into_iter().flatten() {
            let Some(value) = point.reported_value.and_then(|v| v.raw) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(&point.as_of_date, "%Y-%m-%d")
                .with_context(|| format!("Invalid asOfDate '{}'", point.as_of_date))?;
            obs.push((FiscalPeriod::new(date), value));
        }
        observations.push((camel_to_title(key), obs));
    }

    Ok(FinancialTable::from_observations(observations))
}
