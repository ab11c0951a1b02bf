use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::error::ContractViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct PortfolioId(pub i64);

impl fmt::Display for PortfolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity sent with every request. This is an unverified token, not a
/// session credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    user_id: String,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>) -> RequestContext {
        RequestContext {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Target annual return as a decimal fraction, `0.3` for 30%
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TargetReturn(f64);

impl TargetReturn {
    pub fn from_percent(percent: f64) -> TargetReturn {
        TargetReturn(percent / 100.0)
    }

    pub fn fraction(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMonthError {
    #[error("month key `{0}` is not in YYYY-MM form")]
    Format(String),
    #[error("month key `{0}` names no calendar month")]
    OutOfRange(String),
}

/// A calendar month, parsed from a `YYYY-MM` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<MonthKey> {
        NaiveDate::from_ymd_opt(year, month, 1).map(MonthKey)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Display label such as `May 2024`
    pub fn label(self) -> String {
        self.0.format("%b %Y").to_string()
    }
}

impl FromStr for MonthKey {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || ParseMonthError::Format(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(format_err)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format_err());
        }

        let year = year.parse::<i32>().map_err(|_| format_err())?;
        let month = month.parse::<u32>().map_err(|_| format_err())?;

        MonthKey::new(year, month).ok_or_else(|| ParseMonthError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Ticker to share count, in the order the backend listed them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Holdings {
    entries: Vec<(String, f64)>,
}

impl Holdings {
    pub fn new() -> Holdings {
        Holdings::default()
    }

    /// Inserts or replaces `ticker`, keeping its original position on replace
    pub fn insert(&mut self, ticker: impl Into<String>, shares: f64) {
        let ticker = ticker.into();

        match self.entries.iter_mut().find(|(t, _)| *t == ticker) {
            Some(entry) => entry.1 = shares,
            None => self.entries.push((ticker, shares)),
        }
    }

    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, shares)| *shares)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(t, s)| (t.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, s)| s).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Holdings {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut holdings = Holdings::new();
        for (ticker, shares) in iter {
            holdings.insert(ticker, shares);
        }
        holdings
    }
}

impl<'de> Deserialize<'de> for Holdings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserialize_entries::<D, f64>(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_invested: f64,
    pub current_value: f64,
    pub profit: f64,
    /// Percentage, `12.5` for 12.5%
    pub cagr: f64,
    pub net_shares: Holdings,
    pub max_drawdown: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    points: Vec<(MonthKey, f64)>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TimeSeries {
    pub fn new(points: Vec<(MonthKey, f64)>) -> TimeSeries {
        TimeSeries {
            points,
            start_date: None,
            end_date: None,
        }
    }

    pub fn points(&self) -> &[(MonthKey, f64)] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last day covered, preferring the dates reported by the
    /// backend over the month keys
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.points.first().map(|(m, _)| m.first_day());
        let last = self.points.last().map(|(m, _)| m.first_day());

        match (self.start_date.or(first), self.end_date.or(last)) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FeasibleRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub total_invested: f64,
    pub current_value: f64,
    pub profit: f64,
    pub cagr: f64,
    pub net_shares: Holdings,
    /// Ticker to portfolio weight, summing to 1
    pub allocation: Option<Holdings>,
    pub expected_return: Option<f64>,
    pub expected_volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcaParams {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub years: u32,
    pub target_return: TargetReturn,
}

impl DcaParams {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("initial_investment", self.initial_investment.to_string()),
            ("monthly_contribution", self.monthly_contribution.to_string()),
            ("years", self.years.to_string()),
            ("target_return", self.target_return.fraction().to_string()),
        ]
    }
}

/// Simulated actual vs optimized portfolio values. The three sequences
/// always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct DcaSeries {
    dates: Vec<MonthKey>,
    actual: Vec<f64>,
    optimized: Vec<f64>,
    pub actual_cagr: Option<f64>,
    pub optimized_cagr: Option<f64>,
}

impl DcaSeries {
    pub fn new(
        dates: Vec<MonthKey>,
        actual: Vec<f64>,
        optimized: Vec<f64>,
    ) -> Result<DcaSeries, ContractViolation> {
        if dates.len() != actual.len() || dates.len() != optimized.len() {
            return Err(ContractViolation::ShapeMismatch {
                dates: dates.len(),
                actual: actual.len(),
                optimized: optimized.len(),
            });
        }

        Ok(DcaSeries {
            dates,
            actual,
            optimized,
            actual_cagr: None,
            optimized_cagr: None,
        })
    }

    pub fn dates(&self) -> &[MonthKey] {
        &self.dates
    }

    pub fn actual(&self) -> &[f64] {
        &self.actual
    }

    pub fn optimized(&self) -> &[f64] {
        &self.optimized
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketEvent {
    pub date: NaiveDate,
    pub headline: String,
}

// Raw response bodies. Every field is optional here so that a missing field
// surfaces as a `ContractViolation` rather than a decode error.

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    portfolio_id: Option<PortfolioId>,
}

impl UploadResponse {
    pub fn validate(self) -> Result<PortfolioId, ContractViolation> {
        require(self.portfolio_id, "portfolio_id")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricsResponse {
    metrics: Option<RawMetrics>,
}

#[derive(Debug, Deserialize)]
struct RawMetrics {
    total_invested: Option<f64>,
    current_value: Option<f64>,
    profit: Option<f64>,
    cagr: Option<f64>,
    net_shares: Option<Holdings>,
    max_drawdown: Option<f64>,
    sharpe_ratio: Option<f64>,
}

impl MetricsResponse {
    pub fn validate(self) -> Result<Metrics, ContractViolation> {
        let raw = require(self.metrics, "metrics")?;

        Ok(Metrics {
            total_invested: require(raw.total_invested, "metrics.total_invested")?,
            current_value: require(raw.current_value, "metrics.current_value")?,
            profit: require(raw.profit, "metrics.profit")?,
            cagr: require(raw.cagr, "metrics.cagr")?,
            net_shares: require(raw.net_shares, "metrics.net_shares")?,
            max_drawdown: raw.max_drawdown,
            sharpe_ratio: raw.sharpe_ratio,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValueOverTimeResponse {
    #[serde(default, deserialize_with = "deserialize_optional_entries")]
    monthly_portfolio_value: Option<Vec<(String, f64)>>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl ValueOverTimeResponse {
    pub fn validate(self) -> Result<TimeSeries, ContractViolation> {
        let monthly = require(self.monthly_portfolio_value, "monthly_portfolio_value")?;

        let points = monthly
            .into_iter()
            .map(|(key, value)| Ok((key.parse::<MonthKey>()?, value)))
            .collect::<Result<Vec<_>, ContractViolation>>()?;

        Ok(TimeSeries {
            points,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptimizeResponse {
    optimization_result: Option<RawOptimizationResult>,
}

#[derive(Debug, Deserialize)]
struct RawOptimizationResult {
    total_invested: Option<f64>,
    current_value: Option<f64>,
    profit: Option<f64>,
    cagr: Option<f64>,
    net_shares: Option<Holdings>,
    optimized_allocation: Option<Holdings>,
    expected_return: Option<f64>,
    expected_volatility: Option<f64>,
    sharpe_ratio: Option<f64>,
    max_drawdown: Option<f64>,
    message: Option<String>,
    reason: Option<String>,
    feasible_return_range: Option<FeasibleRange>,
}

impl OptimizeResponse {
    pub fn validate(self) -> Result<OptimizationResult, ContractViolation> {
        let raw = require(self.optimization_result, "optimization_result")?;

        let net_shares = match raw.net_shares {
            Some(net_shares) => net_shares,
            None => {
                let message = match (raw.message, raw.reason) {
                    (Some(message), Some(reason)) => Some(format!("{} ({})", message, reason)),
                    (message, reason) => message.or(reason),
                };

                return Err(ContractViolation::MissingAllocation {
                    message,
                    feasible: raw.feasible_return_range,
                });
            }
        };

        if let Some((ticker, shares)) = net_shares.iter().find(|(_, shares)| *shares < 0.0) {
            return Err(ContractViolation::NegativeShares {
                ticker: ticker.to_string(),
                shares,
            });
        }

        Ok(OptimizationResult {
            total_invested: require(raw.total_invested, "optimization_result.total_invested")?,
            current_value: require(raw.current_value, "optimization_result.current_value")?,
            profit: require(raw.profit, "optimization_result.profit")?,
            cagr: require(raw.cagr, "optimization_result.cagr")?,
            net_shares,
            allocation: raw.optimized_allocation,
            expected_return: raw.expected_return,
            expected_volatility: raw.expected_volatility,
            sharpe_ratio: raw.sharpe_ratio,
            max_drawdown: raw.max_drawdown,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DcaResponse {
    dates: Option<Vec<String>>,
    actual_portfolio_values: Option<Vec<f64>>,
    optimized_portfolio_values: Option<Vec<f64>>,
    actual_cagr: Option<f64>,
    optimized_cagr: Option<f64>,
    message: Option<String>,
    reason: Option<String>,
}

impl DcaResponse {
    pub fn validate(self) -> Result<DcaSeries, ContractViolation> {
        if self.dates.is_none() {
            if let Some(message) = self.message {
                let message = match self.reason {
                    Some(reason) => format!("{}: {}", message, reason),
                    None => message,
                };
                return Err(ContractViolation::Rejected(message));
            }
        }

        let dates = require(self.dates, "dates")?;
        let actual = require(self.actual_portfolio_values, "actual_portfolio_values")?;
        let optimized = require(self.optimized_portfolio_values, "optimized_portfolio_values")?;

        // Shape is checked before the keys so a short array is reported as such
        if dates.len() != actual.len() || dates.len() != optimized.len() {
            return Err(ContractViolation::ShapeMismatch {
                dates: dates.len(),
                actual: actual.len(),
                optimized: optimized.len(),
            });
        }

        let dates = dates
            .iter()
            .map(|d| d.parse::<MonthKey>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut series = DcaSeries::new(dates, actual, optimized)?;
        series.actual_cagr = self.actual_cagr;
        series.optimized_cagr = self.optimized_cagr;

        Ok(series)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarketEventsResponse {
    events: Option<Vec<MarketEvent>>,
}

impl MarketEventsResponse {
    pub fn validate(self) -> Result<Vec<MarketEvent>, ContractViolation> {
        require(self.events, "events")
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ContractViolation> {
    value.ok_or(ContractViolation::MissingField(field))
}

fn deserialize_optional_entries<'de, D>(deserializer: D) -> Result<Option<Vec<(String, f64)>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_entries::<D, f64>(deserializer).map(Some)
}

/// Reads a JSON object as a list of entries, keeping the key order of the
/// document
fn deserialize_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for EntriesVisitor<T>
    where
        T: Deserialize<'de>,
    {
        type Value = Vec<(String, T)>;

        fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
            fmt.write_str("a map of string keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_parses_and_labels() {
        let key: MonthKey = "2024-05".parse().unwrap();

        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 5);
        assert_eq!(key.label(), "May 2024");
        assert_eq!(key.to_string(), "2024-05");
    }

    #[test]
    fn month_key_rejects_malformed_keys() {
        for bad in ["2024-5", "24-05", "2024/05", "2024-05-01", "", "abcd-ef", "2024-+5"] {
            assert_eq!(
                bad.parse::<MonthKey>(),
                Err(ParseMonthError::Format(bad.to_string())),
                "{}",
                bad
            );
        }

        assert_eq!(
            "2024-13".parse::<MonthKey>(),
            Err(ParseMonthError::OutOfRange("2024-13".to_string()))
        );
        assert!("2024-00".parse::<MonthKey>().is_err());
    }

    #[test]
    fn target_return_converts_percent_exactly() {
        assert_eq!(TargetReturn::from_percent(30.0).fraction(), 0.3);
        assert_eq!(TargetReturn::from_percent(10.0).fraction(), 0.1);
        assert_eq!(TargetReturn::from_percent(30.0).fraction().to_string(), "0.3");
    }

    #[test]
    fn holdings_keep_document_order() {
        let response: MetricsResponse = serde_json::from_str(
            r#"{"portfolio_id": 1, "metrics": {
                "total_invested": 1000.0, "current_value": 1200.0, "profit": 200.0,
                "cagr": 12.5, "net_shares": {"MSFT": 2, "AAPL": 3, "GOOGL": 0.5},
                "max_drawdown": -8.1, "sharpe_ratio": 1.2}}"#,
        )
        .unwrap();

        let metrics = response.validate().unwrap();
        let tickers: Vec<_> = metrics.net_shares.iter().map(|(t, _)| t).collect();

        assert_eq!(tickers, vec!["MSFT", "AAPL", "GOOGL"]);
        assert_eq!(metrics.net_shares.get("AAPL"), Some(3.0));
        assert_eq!(metrics.max_drawdown, Some(-8.1));
    }

    #[test]
    fn duplicate_tickers_replace_in_place() {
        let holdings: Holdings = serde_json::from_str(r#"{"AAPL": 1, "MSFT": 2, "AAPL": 5}"#).unwrap();

        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings.iter().next(), Some(("AAPL", 5.0)));
    }

    #[test]
    fn metrics_without_envelope_field_is_a_contract_violation() {
        let response: MetricsResponse = serde_json::from_str(r#"{"portfolio_id": 1}"#).unwrap();

        assert_eq!(
            response.validate(),
            Err(ContractViolation::MissingField("metrics"))
        );

        let response: MetricsResponse =
            serde_json::from_str(r#"{"metrics": {"total_invested": 1, "current_value": 1, "profit": 0, "cagr": 0}}"#)
                .unwrap();

        assert_eq!(
            response.validate(),
            Err(ContractViolation::MissingField("metrics.net_shares"))
        );
    }

    #[test]
    fn value_over_time_parses_month_keys_in_order() {
        let response: ValueOverTimeResponse = serde_json::from_str(
            r#"{"start_date": "2023-01-01", "end_date": "2023-03-01",
                "monthly_portfolio_value": {"2023-01": 1500.0, "2023-02": 2000.5, "2023-03": 1980.0},
                "target_return": 0.08}"#,
        )
        .unwrap();

        let series = response.validate().unwrap();
        let months: Vec<_> = series.points().iter().map(|(m, _)| m.to_string()).collect();

        assert_eq!(months, vec!["2023-01", "2023-02", "2023-03"]);
        assert_eq!(series.points()[1].1, 2000.5);
        assert_eq!(
            series.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
            ))
        );
    }

    #[test]
    fn value_over_time_rejects_bad_month_key() {
        let response: ValueOverTimeResponse =
            serde_json::from_str(r#"{"monthly_portfolio_value": {"2023-1": 10.0}}"#).unwrap();

        assert_eq!(
            response.validate(),
            Err(ContractViolation::InvalidMonth(ParseMonthError::Format(
                "2023-1".into()
            )))
        );
    }

    #[test]
    fn optimization_without_allocation_keeps_backend_explanation() {
        let response: OptimizeResponse = serde_json::from_str(
            r#"{"portfolio_id": 1, "target_return": 0.9, "optimization_result": {
                "message": "Target return not feasible with current assets.",
                "feasible_return_range": {"min": 0.12, "max": 0.4}}}"#,
        )
        .unwrap();

        assert_eq!(
            response.validate(),
            Err(ContractViolation::MissingAllocation {
                message: Some("Target return not feasible with current assets.".into()),
                feasible: Some(FeasibleRange { min: 0.12, max: 0.4 }),
            })
        );
    }

    #[test]
    fn optimization_rejects_negative_shares() {
        let response: OptimizeResponse = serde_json::from_str(
            r#"{"optimization_result": {"total_invested": 1, "current_value": 1, "profit": 0,
                "cagr": 30, "net_shares": {"AAPL": 2, "MSFT": -1}}}"#,
        )
        .unwrap();

        assert_eq!(
            response.validate(),
            Err(ContractViolation::NegativeShares {
                ticker: "MSFT".into(),
                shares: -1.0
            })
        );
    }

    #[test]
    fn optimization_result_keeps_extras() {
        let response: OptimizeResponse = serde_json::from_str(
            r#"{"optimization_result": {"optimized_allocation": {"AAPL": 0.6, "MSFT": 0.4},
                "expected_return": 0.3, "expected_volatility": 0.2, "sharpe_ratio": 1.4,
                "total_invested": 2000, "current_value": 2600, "profit": 600,
                "net_shares": {"AAPL": 8.1, "MSFT": 2.7}, "cagr": 29.8, "max_drawdown": -12.3,
                "sharpe_ratio_full": 1.1}}"#,
        )
        .unwrap();

        let result = response.validate().unwrap();

        assert_eq!(result.cagr, 29.8);
        assert_eq!(result.net_shares.get("MSFT"), Some(2.7));
        assert_eq!(result.allocation.unwrap().get("AAPL"), Some(0.6));
        assert_eq!(result.expected_volatility, Some(0.2));
    }

    #[test]
    fn dca_series_requires_equal_lengths() {
        let response: DcaResponse = serde_json::from_str(
            r#"{"dates": ["2025-01", "2025-02"], "actual_portfolio_values": [1, 2],
                "optimized_portfolio_values": [1]}"#,
        )
        .unwrap();

        assert_eq!(
            response.validate(),
            Err(ContractViolation::ShapeMismatch {
                dates: 2,
                actual: 2,
                optimized: 1
            })
        );
    }

    #[test]
    fn dca_series_reports_backend_rejection() {
        let response: DcaResponse =
            serde_json::from_str(r#"{"message": "Optimization failed", "reason": "singular matrix"}"#)
                .unwrap();

        assert_eq!(
            response.validate(),
            Err(ContractViolation::Rejected(
                "Optimization failed: singular matrix".into()
            ))
        );
    }

    #[test]
    fn dca_series_validates() {
        let response: DcaResponse = serde_json::from_str(
            r#"{"dates": ["2025-06", "2025-07"], "actual_portfolio_values": [10504.1, 11010.3],
                "optimized_portfolio_values": [10620.0, 11250.9], "actual_cagr": 8.2,
                "optimized_cagr": 30.0}"#,
        )
        .unwrap();

        let series = response.validate().unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.dates()[1].label(), "Jul 2025");
        assert_eq!(series.optimized()[0], 10620.0);
        assert_eq!(series.optimized_cagr, Some(30.0));
    }

    #[test]
    fn dca_params_query_order() {
        let params = DcaParams {
            initial_investment: 12500.5,
            monthly_contribution: 500.0,
            years: 10,
            target_return: TargetReturn::from_percent(30.0),
        };

        assert_eq!(
            serde_urlencoded::to_string(params.query()).unwrap(),
            "initial_investment=12500.5&monthly_contribution=500&years=10&target_return=0.3"
        );
    }
}
