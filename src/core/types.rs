use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use super::error::{InputError, require_finite, require_horizon, require_non_negative};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    /// Additive adjustment, in percentage points, applied to the age-based stock share.
    pub fn stock_adjustment(self) -> i32 {
        match self {
            RiskTolerance::Conservative => -15,
            RiskTolerance::Moderate => 0,
            RiskTolerance::Aggressive => 15,
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            _ => Err(InputError::UnknownRiskTolerance(s.to_string())),
        }
    }
}

/// Dashboard chart window.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::All,
    ];

    pub fn days(self) -> u32 {
        match self {
            TimeRange::OneMonth => 30,
            TimeRange::ThreeMonths => 90,
            TimeRange::SixMonths => 180,
            TimeRange::OneYear => 365,
            TimeRange::All => 730,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
            TimeRange::All => "All",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::UnknownTimeRange(s.to_string()))
    }
}

/// Validated parameters for one growth projection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectionInput {
    pub principal: f64,
    pub monthly_contribution: f64,
    pub years: u32,
    pub annual_rate_percent: f64,
}

impl ProjectionInput {
    pub fn new(
        principal: f64,
        monthly_contribution: f64,
        years: u32,
        annual_rate_percent: f64,
    ) -> Result<Self, InputError> {
        let principal = require_non_negative("principal", principal)?;
        let monthly_contribution =
            require_non_negative("monthlyContribution", monthly_contribution)?;
        let years = require_horizon(years)?;
        let annual_rate_percent = require_finite("annualRate", annual_rate_percent)?;

        Ok(Self {
            principal,
            monthly_contribution,
            years,
            annual_rate_percent,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySnapshot {
    pub year: u32,
    pub value: f64,
    pub contributions: f64,
    pub gains: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub future_value: f64,
    pub total_contributions: f64,
    pub investment_gains: f64,
    #[serde(rename = "yearlyData")]
    pub yearly_series: Vec<YearlySnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeImpact {
    pub without_fees: f64,
    pub with_fees: f64,
    pub fee_impact: f64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct AllocationSuggestion {
    pub stocks: i32,
    pub bonds: i32,
    pub cash: i32,
    pub alternatives: i32,
}

impl AllocationSuggestion {
    pub fn total(self) -> i32 {
        self.stocks + self.bonds + self.cash + self.alternatives
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub change_percent: f64,
}
