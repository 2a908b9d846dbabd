use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    AllocationSuggestion, CurrencyFormat, DEFAULT_INFLATION_PERCENT, FeeImpact, InputError,
    MAX_DEMO_DAYS, ProjectionInput, ProjectionResult, RiskTolerance, SyntheticSeriesPoint,
    TimeRange, compute_fee_impact, compute_required_monthly_savings, compute_retirement_goal,
    format_currency, format_percent, generate_demo_series, project, require_finite,
    require_horizon, require_in_range, require_non_negative, suggest_allocation,
};

pub const CALCULATOR_DISCLAIMER: &str = "This calculator provides estimates for illustrative purposes only. Actual returns may vary based on market conditions and individual circumstances.";

/// Slider bounds of the public calculator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

pub const INITIAL_INVESTMENT_LIMITS: Limits = Limits {
    min: 10_000.0,
    max: 10_000_000.0,
};
pub const MONTHLY_CONTRIBUTION_LIMITS: Limits = Limits {
    min: 0.0,
    max: 50_000.0,
};
pub const TIME_HORIZON_LIMITS: Limits = Limits { min: 1.0, max: 40.0 };
pub const EXPECTED_RETURN_LIMITS: Limits = Limits { min: 3.0, max: 12.0 };

/// Oldest age the retirement sizer accepts.
pub const MAX_AGE: u32 = 120;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Io(_) | ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status != StatusCode::NOT_FOUND {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        json_response(
            status,
            ErrorResponse {
                error: self.to_string(),
            },
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<CliRiskTolerance> for RiskTolerance {
    fn from(value: CliRiskTolerance) -> Self {
        match value {
            CliRiskTolerance::Conservative => RiskTolerance::Conservative,
            CliRiskTolerance::Moderate => RiskTolerance::Moderate,
            CliRiskTolerance::Aggressive => RiskTolerance::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTimeRange {
    #[value(name = "1M")]
    OneMonth,
    #[value(name = "3M")]
    ThreeMonths,
    #[value(name = "6M")]
    SixMonths,
    #[value(name = "1Y")]
    OneYear,
    #[value(name = "All")]
    All,
}

impl From<CliTimeRange> for TimeRange {
    fn from(value: CliTimeRange) -> Self {
        match value {
            CliTimeRange::OneMonth => TimeRange::OneMonth,
            CliTimeRange::ThreeMonths => TimeRange::ThreeMonths,
            CliTimeRange::SixMonths => TimeRange::SixMonths,
            CliTimeRange::OneYear => TimeRange::OneYear,
            CliTimeRange::All => TimeRange::All,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "meridian",
    about = "Investment growth projections, fee drag, retirement sizing and allocation suggestions"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(default_value_t = 8080)]
        port: u16,
    },
    /// Project a balance with monthly contributions.
    Project(ProjectArgs),
    /// Compare a balance with and without an annual fee.
    FeeImpact(FeeImpactArgs),
    /// Size a retirement corpus from today's expenses.
    RetirementGoal(RetirementGoalArgs),
    /// Monthly savings needed to reach a goal.
    RequiredSavings(RequiredSavingsArgs),
    /// Suggest a stock/bond/cash/alternatives split.
    Allocation(AllocationArgs),
    /// Print a synthetic dashboard series.
    DemoSeries(DemoSeriesArgs),
}

#[derive(Args, Debug, Clone)]
struct ProjectArgs {
    #[arg(long, default_value_t = 100_000.0, help = "Initial investment")]
    principal: f64,
    #[arg(long, default_value_t = 2_000.0)]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 20)]
    years: u32,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Expected annual return in percent, e.g. 7"
    )]
    annual_rate: f64,
    #[arg(
        long,
        default_value_t = false,
        help = "Reject values outside the calculator slider ranges"
    )]
    strict_limits: bool,
    #[arg(long, default_value_t = false, help = "Print amounts as $2.5M style")]
    compact: bool,
    #[arg(long, default_value_t = false, help = "Print the JSON API response")]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct FeeImpactArgs {
    #[arg(long, default_value_t = 1_000_000.0)]
    principal: f64,
    #[arg(long, default_value_t = 30)]
    years: u32,
    #[arg(long, default_value_t = 7.0, help = "Gross annual return in percent")]
    gross_return: f64,
    #[arg(long, default_value_t = 1.0, help = "Annual fee in percent")]
    fee_percent: f64,
}

#[derive(Args, Debug, Clone)]
struct RetirementGoalArgs {
    #[arg(long, default_value_t = 40)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 100_000.0, help = "Annual expenses in today's money")]
    annual_expenses: f64,
    #[arg(long, default_value_t = 30)]
    years_in_retirement: u32,
    #[arg(long, default_value_t = DEFAULT_INFLATION_PERCENT, help = "Annual inflation in percent")]
    inflation_rate: f64,
}

#[derive(Args, Debug, Clone)]
struct RequiredSavingsArgs {
    #[arg(long, default_value_t = 1_000_000.0)]
    goal: f64,
    #[arg(long, default_value_t = 20)]
    years: u32,
    #[arg(long, default_value_t = 7.0, help = "Expected annual return in percent")]
    annual_rate: f64,
    #[arg(long, default_value_t = 0.0)]
    current_savings: f64,
}

#[derive(Args, Debug, Clone)]
struct AllocationArgs {
    #[arg(long, default_value_t = 40)]
    age: u32,
    #[arg(long, value_enum, default_value_t = CliRiskTolerance::Moderate)]
    risk_tolerance: CliRiskTolerance,
}

#[derive(Args, Debug, Clone)]
struct DemoSeriesArgs {
    #[arg(long, value_enum, default_value_t = CliTimeRange::OneMonth)]
    range: CliTimeRange,
    #[arg(long, help = "Window length in days, overrides --range")]
    days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    principal: Option<f64>,
    monthly_contribution: Option<f64>,
    years: Option<u32>,
    annual_rate: Option<f64>,
    strict_limits: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FeeImpactPayload {
    principal: Option<f64>,
    years: Option<u32>,
    gross_return: Option<f64>,
    fee_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementGoalPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    annual_expenses: Option<f64>,
    years_in_retirement: Option<u32>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RequiredSavingsPayload {
    goal: Option<f64>,
    years: Option<u32>,
    annual_rate: Option<f64>,
    current_savings: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AllocationPayload {
    age: Option<u32>,
    risk_tolerance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DemoSeriesPayload {
    range: Option<String>,
    days: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedSummary {
    future_value: String,
    total_contributions: String,
    investment_gains: String,
    future_value_compact: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    principal: f64,
    monthly_contribution: f64,
    years: u32,
    annual_rate: f64,
    #[serde(flatten)]
    result: ProjectionResult,
    formatted: FormattedSummary,
    disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeeImpactResponse {
    principal: f64,
    years: u32,
    gross_return: f64,
    fee_percent: f64,
    #[serde(flatten)]
    impact: FeeImpact,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetirementGoalResponse {
    current_age: u32,
    retirement_age: u32,
    annual_expenses: f64,
    years_in_retirement: u32,
    inflation_rate: f64,
    retirement_goal: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequiredSavingsResponse {
    goal: f64,
    years: u32,
    annual_rate: f64,
    current_savings: f64,
    monthly_savings: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    age: u32,
    risk_tolerance: RiskTolerance,
    #[serde(flatten)]
    allocation: AllocationSuggestion,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoSeriesResponse {
    range: Option<TimeRange>,
    days: u32,
    points: Vec<SyntheticSeriesPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub async fn run(cli: Cli) -> Result<(), ApiError> {
    match cli.command {
        Command::Serve { port } => run_http_server(port).await?,
        Command::Project(args) => {
            let json = args.json;
            let compact = args.compact;
            let response = project_response(args)?;
            if json {
                print_json(&response)?;
            } else {
                print_projection(&response, compact);
            }
        }
        Command::FeeImpact(args) => print_json(&fee_impact_response(args)?)?,
        Command::RetirementGoal(args) => print_json(&retirement_goal_response(args)?)?,
        Command::RequiredSavings(args) => print_json(&required_savings_response(args)?)?,
        Command::Allocation(args) => print_json(&allocation_response(
            args.age,
            args.risk_tolerance.into(),
        ))?,
        Command::DemoSeries(args) => {
            let (range, days) = match args.days {
                Some(days) => (None, days),
                None => {
                    let range = TimeRange::from(args.range);
                    (Some(range), range.days())
                }
            };
            print_json(&demo_series_response(range, days)?)?;
        }
    }
    Ok(())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "growth API listening");
    info!("local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/project", get(project_get_handler).post(project_post_handler))
        .route(
            "/api/fee-impact",
            get(fee_impact_get_handler).post(fee_impact_post_handler),
        )
        .route(
            "/api/retirement-goal",
            get(retirement_goal_get_handler).post(retirement_goal_post_handler),
        )
        .route(
            "/api/required-savings",
            get(required_savings_get_handler).post(required_savings_post_handler),
        )
        .route(
            "/api/allocation",
            get(allocation_get_handler).post(allocation_post_handler),
        )
        .route(
            "/api/demo-series",
            get(demo_series_get_handler).post(demo_series_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    respond(project_response(project_args_from_payload(payload)))
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    respond(project_response(project_args_from_payload(payload)))
}

async fn fee_impact_get_handler(Query(payload): Query<FeeImpactPayload>) -> Response {
    respond(fee_impact_response(fee_impact_args_from_payload(payload)))
}

async fn fee_impact_post_handler(Json(payload): Json<FeeImpactPayload>) -> Response {
    respond(fee_impact_response(fee_impact_args_from_payload(payload)))
}

async fn retirement_goal_get_handler(Query(payload): Query<RetirementGoalPayload>) -> Response {
    respond(retirement_goal_response(retirement_goal_args_from_payload(
        payload,
    )))
}

async fn retirement_goal_post_handler(Json(payload): Json<RetirementGoalPayload>) -> Response {
    respond(retirement_goal_response(retirement_goal_args_from_payload(
        payload,
    )))
}

async fn required_savings_get_handler(Query(payload): Query<RequiredSavingsPayload>) -> Response {
    respond(required_savings_response(required_savings_args_from_payload(
        payload,
    )))
}

async fn required_savings_post_handler(Json(payload): Json<RequiredSavingsPayload>) -> Response {
    respond(required_savings_response(required_savings_args_from_payload(
        payload,
    )))
}

async fn allocation_get_handler(Query(payload): Query<AllocationPayload>) -> Response {
    respond(allocation_from_payload(payload))
}

async fn allocation_post_handler(Json(payload): Json<AllocationPayload>) -> Response {
    respond(allocation_from_payload(payload))
}

async fn demo_series_get_handler(Query(payload): Query<DemoSeriesPayload>) -> Response {
    respond(demo_series_from_payload(payload))
}

async fn demo_series_post_handler(Json(payload): Json<DemoSeriesPayload>) -> Response {
    respond(demo_series_from_payload(payload))
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => err.into_response(),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn print_json<T: Serialize>(body: &T) -> Result<(), ApiError> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

fn print_projection(response: &ProjectResponse, compact: bool) {
    let format = if compact {
        CurrencyFormat::compact()
    } else {
        CurrencyFormat::default()
    };
    println!(
        "{:>4}  {:>16}  {:>16}  {:>16}",
        "Year", "Value", "Contributions", "Gains"
    );
    for snap in &response.result.yearly_series {
        println!(
            "{:>4}  {:>16}  {:>16}  {:>16}",
            snap.year,
            format_currency(snap.value, format),
            format_currency(snap.contributions, format),
            format_currency(snap.gains, format),
        );
    }
    println!();
    println!(
        "Future value {} from {} contributed, {} gained at {} a year",
        response.formatted.future_value,
        response.formatted.total_contributions,
        response.formatted.investment_gains,
        format_percent(response.annual_rate, 1, false),
    );
    println!("{}", response.disclaimer);
}

fn default_project_args() -> ProjectArgs {
    ProjectArgs {
        principal: 100_000.0,
        monthly_contribution: 2_000.0,
        years: 20,
        annual_rate: 7.0,
        strict_limits: false,
        compact: false,
        json: false,
    }
}

fn project_args_from_payload(payload: ProjectPayload) -> ProjectArgs {
    let mut args = default_project_args();

    if let Some(v) = payload.principal {
        args.principal = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.annual_rate {
        args.annual_rate = v;
    }
    if let Some(v) = payload.strict_limits {
        args.strict_limits = v;
    }

    args
}

fn build_projection_input(args: &ProjectArgs) -> Result<ProjectionInput, InputError> {
    if args.strict_limits {
        require_in_range(
            "principal",
            args.principal,
            INITIAL_INVESTMENT_LIMITS.min,
            INITIAL_INVESTMENT_LIMITS.max,
        )?;
        require_in_range(
            "monthlyContribution",
            args.monthly_contribution,
            MONTHLY_CONTRIBUTION_LIMITS.min,
            MONTHLY_CONTRIBUTION_LIMITS.max,
        )?;
        require_in_range(
            "years",
            args.years as f64,
            TIME_HORIZON_LIMITS.min,
            TIME_HORIZON_LIMITS.max,
        )?;
        require_in_range(
            "annualRate",
            args.annual_rate,
            EXPECTED_RETURN_LIMITS.min,
            EXPECTED_RETURN_LIMITS.max,
        )?;
    }

    ProjectionInput::new(
        args.principal,
        args.monthly_contribution,
        args.years,
        args.annual_rate,
    )
}

fn project_response(args: ProjectArgs) -> Result<ProjectResponse, ApiError> {
    let input = build_projection_input(&args)?;
    let result = project(&input);
    info!(
        years = input.years,
        future_value = result.future_value,
        "projection computed"
    );

    let formatted = FormattedSummary {
        future_value: format_currency(result.future_value, CurrencyFormat::default()),
        total_contributions: format_currency(result.total_contributions, CurrencyFormat::default()),
        investment_gains: format_currency(result.investment_gains, CurrencyFormat::default()),
        future_value_compact: format_currency(result.future_value, CurrencyFormat::compact()),
    };

    Ok(ProjectResponse {
        principal: input.principal,
        monthly_contribution: input.monthly_contribution,
        years: input.years,
        annual_rate: input.annual_rate_percent,
        result,
        formatted,
        disclaimer: CALCULATOR_DISCLAIMER,
    })
}

fn fee_impact_args_from_payload(payload: FeeImpactPayload) -> FeeImpactArgs {
    FeeImpactArgs {
        principal: payload.principal.unwrap_or(1_000_000.0),
        years: payload.years.unwrap_or(30),
        gross_return: payload.gross_return.unwrap_or(7.0),
        fee_percent: payload.fee_percent.unwrap_or(1.0),
    }
}

fn fee_impact_response(args: FeeImpactArgs) -> Result<FeeImpactResponse, ApiError> {
    let principal = require_non_negative("principal", args.principal)?;
    let gross_return = require_finite("grossReturn", args.gross_return)?;
    let fee_percent = require_non_negative("feePercent", args.fee_percent)?;
    require_horizon(args.years)?;

    let impact = compute_fee_impact(principal, args.years, gross_return, fee_percent);
    info!(
        years = args.years,
        fee_impact = impact.fee_impact,
        "fee impact computed"
    );

    Ok(FeeImpactResponse {
        principal,
        years: args.years,
        gross_return,
        fee_percent,
        impact,
    })
}

fn retirement_goal_args_from_payload(payload: RetirementGoalPayload) -> RetirementGoalArgs {
    RetirementGoalArgs {
        current_age: payload.current_age.unwrap_or(40),
        retirement_age: payload.retirement_age.unwrap_or(65),
        annual_expenses: payload.annual_expenses.unwrap_or(100_000.0),
        years_in_retirement: payload.years_in_retirement.unwrap_or(30),
        inflation_rate: payload.inflation_rate.unwrap_or(DEFAULT_INFLATION_PERCENT),
    }
}

fn retirement_goal_response(args: RetirementGoalArgs) -> Result<RetirementGoalResponse, ApiError> {
    require_in_range("retirementAge", args.retirement_age as f64, 0.0, MAX_AGE as f64)?;
    if args.retirement_age < args.current_age {
        return Err(InputError::AgeOrder {
            current: args.current_age,
            retirement: args.retirement_age,
        }
        .into());
    }
    let annual_expenses = require_non_negative("annualExpenses", args.annual_expenses)?;
    let inflation_rate = require_finite("inflationRate", args.inflation_rate)?;

    let retirement_goal = compute_retirement_goal(
        args.current_age,
        args.retirement_age,
        annual_expenses,
        args.years_in_retirement,
        inflation_rate,
    );
    info!(retirement_goal, "retirement goal computed");

    Ok(RetirementGoalResponse {
        current_age: args.current_age,
        retirement_age: args.retirement_age,
        annual_expenses,
        years_in_retirement: args.years_in_retirement,
        inflation_rate,
        retirement_goal,
    })
}

fn required_savings_args_from_payload(payload: RequiredSavingsPayload) -> RequiredSavingsArgs {
    RequiredSavingsArgs {
        goal: payload.goal.unwrap_or(1_000_000.0),
        years: payload.years.unwrap_or(20),
        annual_rate: payload.annual_rate.unwrap_or(7.0),
        current_savings: payload.current_savings.unwrap_or(0.0),
    }
}

fn required_savings_response(
    args: RequiredSavingsArgs,
) -> Result<RequiredSavingsResponse, ApiError> {
    let goal = require_non_negative("goal", args.goal)?;
    let annual_rate = require_finite("annualRate", args.annual_rate)?;
    let current_savings = require_non_negative("currentSavings", args.current_savings)?;
    require_horizon(args.years)?;

    let monthly_savings =
        compute_required_monthly_savings(goal, args.years, annual_rate, current_savings);
    info!(monthly_savings, "required savings computed");

    Ok(RequiredSavingsResponse {
        goal,
        years: args.years,
        annual_rate,
        current_savings,
        monthly_savings,
    })
}

fn allocation_from_payload(payload: AllocationPayload) -> Result<AllocationResponse, ApiError> {
    let risk_tolerance = match payload.risk_tolerance {
        Some(raw) => raw.parse::<RiskTolerance>()?,
        None => RiskTolerance::Moderate,
    };
    Ok(allocation_response(payload.age.unwrap_or(40), risk_tolerance))
}

fn allocation_response(age: u32, risk_tolerance: RiskTolerance) -> AllocationResponse {
    let allocation = suggest_allocation(age, risk_tolerance);
    info!(age, ?risk_tolerance, stocks = allocation.stocks, "allocation suggested");
    AllocationResponse {
        age,
        risk_tolerance,
        allocation,
    }
}

fn demo_series_from_payload(payload: DemoSeriesPayload) -> Result<DemoSeriesResponse, ApiError> {
    match (payload.days, payload.range) {
        (Some(days), _) => demo_series_response(None, days),
        (None, Some(raw)) => {
            let range = raw.parse::<TimeRange>()?;
            demo_series_response(Some(range), range.days())
        }
        (None, None) => {
            let range = TimeRange::default();
            demo_series_response(Some(range), range.days())
        }
    }
}

fn demo_series_response(range: Option<TimeRange>, days: u32) -> Result<DemoSeriesResponse, ApiError> {
    if days > MAX_DEMO_DAYS {
        return Err(InputError::OutOfRange {
            field: "days",
            min: 0.0,
            max: MAX_DEMO_DAYS as f64,
        }
        .into());
    }

    Ok(DemoSeriesResponse {
        range,
        days,
        points: generate_demo_series(days),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_from_json(json: &str) -> Result<ProjectResponse, ApiError> {
        let payload = serde_json::from_str::<ProjectPayload>(json).expect("json should parse");
        project_response(project_args_from_payload(payload))
    }

    #[test]
    fn empty_payload_uses_calculator_defaults() {
        let response = project_from_json("{}").expect("defaults are valid");
        assert_eq!(response.principal, 100_000.0);
        assert_eq!(response.monthly_contribution, 2_000.0);
        assert_eq!(response.years, 20);
        assert_eq!(response.annual_rate, 7.0);
        assert_eq!(response.result.yearly_series.len(), 20);
        assert_eq!(response.result.yearly_series[0].contributions, 124_000.0);
        assert_eq!(response.formatted.total_contributions, "$580,000");
    }

    #[test]
    fn project_payload_parses_web_keys() {
        let json = r#"{
          "principal": 250000,
          "monthlyContribution": 500,
          "years": 5,
          "annualRate": 4.5
        }"#;
        let response = project_from_json(json).expect("json should parse");
        assert_eq!(response.principal, 250_000.0);
        assert_eq!(response.monthly_contribution, 500.0);
        assert_eq!(response.years, 5);
        assert_eq!(response.annual_rate, 4.5);
        assert_eq!(response.result.total_contributions, 280_000.0);
    }

    #[test]
    fn project_rejects_zero_year_horizon() {
        let err = project_from_json(r#"{"years": 0}"#).expect_err("must reject zero years");
        assert!(matches!(
            err,
            ApiError::Input(InputError::HorizonTooShort { years: 0 })
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn project_rejects_negative_contribution() {
        let err = project_from_json(r#"{"monthlyContribution": -5}"#)
            .expect_err("must reject negative contribution");
        assert!(err.to_string().contains("monthlyContribution"));
    }

    #[test]
    fn strict_limits_enforce_slider_ranges() {
        let lenient = project_from_json(r#"{"annualRate": 15}"#);
        assert!(lenient.is_ok());

        let err = project_from_json(r#"{"annualRate": 15, "strictLimits": true}"#)
            .expect_err("15% is above the slider");
        assert_eq!(err.to_string(), "annualRate must be between 3 and 12");

        let err = project_from_json(r#"{"principal": 5000, "strictLimits": true}"#)
            .expect_err("below minimum investment");
        assert!(err.to_string().contains("principal"));
    }

    #[test]
    fn project_response_serialization_contains_expected_fields() {
        let response = project_from_json("{}").expect("defaults are valid");
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"futureValue\""));
        assert!(json.contains("\"totalContributions\""));
        assert!(json.contains("\"investmentGains\""));
        assert!(json.contains("\"yearlyData\""));
        assert!(json.contains("\"futureValueCompact\""));
        assert!(json.contains("\"disclaimer\""));
    }

    #[test]
    fn fee_impact_defaults_and_validation() {
        let response = fee_impact_response(fee_impact_args_from_payload(FeeImpactPayload::default()))
            .expect("defaults are valid");
        assert_eq!(response.years, 30);
        assert!(response.impact.fee_impact > 0.0);

        let payload = serde_json::from_str::<FeeImpactPayload>(r#"{"feePercent": -1}"#)
            .expect("json should parse");
        let err = fee_impact_response(fee_impact_args_from_payload(payload))
            .expect_err("negative fee");
        assert!(err.to_string().contains("feePercent"));
    }

    #[test]
    fn oversized_horizons_are_rejected_on_every_route() {
        let err = project_from_json(r#"{"years": 2000000}"#).expect_err("horizon too long");
        assert!(matches!(
            err,
            ApiError::Input(InputError::OutOfRange { field: "years", .. })
        ));

        let payload = serde_json::from_str::<FeeImpactPayload>(r#"{"years": 400000000}"#)
            .expect("json should parse");
        let err = fee_impact_response(fee_impact_args_from_payload(payload))
            .expect_err("horizon too long");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let payload = serde_json::from_str::<RequiredSavingsPayload>(
            r#"{"goal": 1000000, "years": 200000000, "annualRate": 7}"#,
        )
        .expect("json should parse");
        let err = required_savings_response(required_savings_args_from_payload(payload))
            .expect_err("horizon too long");
        assert_eq!(err.to_string(), "years must be between 1 and 100");

        let payload = serde_json::from_str::<RequiredSavingsPayload>(r#"{"years": 100}"#)
            .expect("json should parse");
        let response = required_savings_response(required_savings_args_from_payload(payload))
            .expect("longest horizon is valid");
        assert!(response.monthly_savings >= 0.0);
    }

    #[test]
    fn retirement_goal_rejects_implausible_ages() {
        let payload = serde_json::from_str::<RetirementGoalPayload>(
            r#"{"currentAge": 40, "retirementAge": 4000000000}"#,
        )
        .expect("json should parse");
        let err = retirement_goal_response(retirement_goal_args_from_payload(payload))
            .expect_err("age out of range");
        assert!(matches!(
            err,
            ApiError::Input(InputError::OutOfRange {
                field: "retirementAge",
                ..
            })
        ));
    }

    #[test]
    fn retirement_goal_rejects_reversed_ages() {
        let payload = serde_json::from_str::<RetirementGoalPayload>(
            r#"{"currentAge": 70, "retirementAge": 65}"#,
        )
        .expect("json should parse");
        let err = retirement_goal_response(retirement_goal_args_from_payload(payload))
            .expect_err("retirement before today");
        assert!(matches!(
            err,
            ApiError::Input(InputError::AgeOrder {
                current: 70,
                retirement: 65
            })
        ));
    }

    #[test]
    fn retirement_goal_uses_default_inflation() {
        let payload = serde_json::from_str::<RetirementGoalPayload>(
            r#"{"currentAge": 65, "retirementAge": 65, "annualExpenses": 40000}"#,
        )
        .expect("json should parse");
        let response = retirement_goal_response(retirement_goal_args_from_payload(payload))
            .expect("valid request");
        assert_eq!(response.inflation_rate, DEFAULT_INFLATION_PERCENT);
        assert_eq!(response.retirement_goal, 1_000_000.0);
    }

    #[test]
    fn required_savings_reports_zero_when_already_funded() {
        let payload = serde_json::from_str::<RequiredSavingsPayload>(
            r#"{"goal": 100000, "years": 10, "annualRate": 5, "currentSavings": 200000}"#,
        )
        .expect("json should parse");
        let response = required_savings_response(required_savings_args_from_payload(payload))
            .expect("valid request");
        assert_eq!(response.monthly_savings, 0.0);
    }

    #[test]
    fn allocation_parses_risk_tolerance() {
        let payload = serde_json::from_str::<AllocationPayload>(
            r#"{"age": 40, "riskTolerance": "moderate"}"#,
        )
        .expect("json should parse");
        let response = allocation_from_payload(payload).expect("valid request");
        assert_eq!(response.allocation.stocks, 60);
        assert_eq!(response.allocation.bonds, 30);
        assert_eq!(response.allocation.cash, 5);
        assert_eq!(response.allocation.alternatives, 5);

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"riskTolerance\":\"moderate\""));
        assert!(json.contains("\"stocks\":60"));
    }

    #[test]
    fn allocation_rejects_unknown_risk_tolerance() {
        let payload = AllocationPayload {
            age: Some(30),
            risk_tolerance: Some("reckless".to_string()),
        };
        let err = allocation_from_payload(payload).expect_err("unknown tolerance");
        assert!(matches!(
            err,
            ApiError::Input(InputError::UnknownRiskTolerance(_))
        ));
    }

    #[test]
    fn demo_series_resolves_dashboard_range() {
        let payload = DemoSeriesPayload {
            range: Some("3M".to_string()),
            days: None,
        };
        let response = demo_series_from_payload(payload).expect("valid range");
        assert_eq!(response.range, Some(TimeRange::ThreeMonths));
        assert_eq!(response.days, 90);
        assert_eq!(response.points.len(), 91);

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"range\":\"3M\""));
        assert!(json.contains("\"changePercent\""));
    }

    #[test]
    fn demo_series_explicit_days_override_range() {
        let payload = DemoSeriesPayload {
            range: Some("1Y".to_string()),
            days: Some(7),
        };
        let response = demo_series_from_payload(payload).expect("valid days");
        assert_eq!(response.range, None);
        assert_eq!(response.points.len(), 8);
    }

    #[test]
    fn demo_series_rejects_bad_input() {
        let err = demo_series_from_payload(DemoSeriesPayload {
            range: Some("2W".to_string()),
            days: None,
        })
        .expect_err("unknown range");
        assert!(matches!(err, ApiError::Input(InputError::UnknownTimeRange(_))));

        let err = demo_series_from_payload(DemoSeriesPayload {
            range: None,
            days: Some(MAX_DEMO_DAYS + 1),
        })
        .expect_err("too many days");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn cli_parses_project_subcommand() {
        let cli = Cli::try_parse_from([
            "meridian",
            "project",
            "--principal",
            "50000",
            "--years",
            "10",
            "--annual-rate",
            "6",
            "--compact",
        ])
        .expect("valid command line");
        let Command::Project(args) = cli.command else {
            panic!("expected project subcommand");
        };
        assert_eq!(args.principal, 50_000.0);
        assert_eq!(args.monthly_contribution, 2_000.0);
        assert_eq!(args.years, 10);
        assert!(args.compact);
        assert!(!args.json);
    }

    #[test]
    fn cli_parses_allocation_and_demo_series() {
        let cli = Cli::try_parse_from([
            "meridian",
            "allocation",
            "--age",
            "55",
            "--risk-tolerance",
            "conservative",
        ])
        .expect("valid command line");
        let Command::Allocation(args) = cli.command else {
            panic!("expected allocation subcommand");
        };
        assert_eq!(RiskTolerance::from(args.risk_tolerance), RiskTolerance::Conservative);

        let cli = Cli::try_parse_from(["meridian", "demo-series", "--range", "6M"])
            .expect("valid command line");
        let Command::DemoSeries(args) = cli.command else {
            panic!("expected demo-series subcommand");
        };
        assert_eq!(TimeRange::from(args.range), TimeRange::SixMonths);
    }

    #[test]
    fn error_responses_are_not_cached() {
        let response =
            ApiError::from(InputError::Negative { field: "goal" }).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }
}
