use tracing::debug;

use super::types::{
    AllocationSuggestion, FeeImpact, ProjectionInput, ProjectionResult, RiskTolerance,
    YearlySnapshot,
};

const MONTHS_PER_YEAR: u32 = 12;

/// Inflation assumed by the retirement goal sizer when the caller has none.
pub const DEFAULT_INFLATION_PERCENT: f64 = 3.0;

/// Corpus multiple of annual expenses (the 4% withdrawal rule).
pub const RETIREMENT_EXPENSE_MULTIPLE: f64 = 25.0;

const MIN_STOCKS: i64 = 20;
const MAX_STOCKS: i64 = 90;
const MIN_BONDS: i32 = 5;
const CASH_TARGET: i32 = 5;

/// Rounds to the nearest whole unit with halves going up (towards +inf),
/// so `-2.5` becomes `-2` and `2.5` becomes `3`.
pub fn round_currency(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / MONTHS_PER_YEAR as f64
}

pub fn project(input: &ProjectionInput) -> ProjectionResult {
    debug!(
        principal = input.principal,
        monthly_contribution = input.monthly_contribution,
        years = input.years,
        annual_rate_percent = input.annual_rate_percent,
        "projecting growth"
    );
    compute_future_value(
        input.principal,
        input.monthly_contribution,
        input.years,
        input.annual_rate_percent,
    )
}

/// Month-by-month compounding with end-of-month contributions and a rounded
/// snapshot after every twelfth month.
///
/// Each snapshot rounds value and contributions independently and derives
/// gains from the rounded pair, so `value == contributions + gains` holds
/// exactly. With `years == 0` the series is empty and the totals describe
/// the untouched principal.
pub fn compute_future_value(
    principal: f64,
    monthly_contribution: f64,
    years: u32,
    annual_rate_percent: f64,
) -> ProjectionResult {
    let rate = monthly_rate(annual_rate_percent);
    let mut balance = principal;
    let mut months_elapsed: u64 = 0;
    let mut yearly_series = Vec::with_capacity(years as usize);

    for year in 1..=years {
        for _ in 0..MONTHS_PER_YEAR {
            balance = balance * (1.0 + rate) + monthly_contribution;
        }
        months_elapsed += u64::from(MONTHS_PER_YEAR);

        let contributions = principal + months_elapsed as f64 * monthly_contribution;
        yearly_series.push(snapshot(year, balance, contributions));
    }

    let terminal = yearly_series
        .last()
        .copied()
        .unwrap_or_else(|| snapshot(0, principal, principal));

    ProjectionResult {
        future_value: terminal.value,
        total_contributions: terminal.contributions,
        investment_gains: terminal.gains,
        yearly_series,
    }
}

fn snapshot(year: u32, balance: f64, contributions: f64) -> YearlySnapshot {
    let value = round_currency(balance);
    let contributions = round_currency(contributions);
    YearlySnapshot {
        year,
        value,
        contributions,
        gains: value - contributions,
    }
}

/// Annually compounded comparison of a fee-free balance against one drained
/// by `fee_percent` a year. Rounding happens only on the returned figures.
pub fn compute_fee_impact(
    principal: f64,
    years: u32,
    gross_return_percent: f64,
    fee_percent: f64,
) -> FeeImpact {
    let periods = years as f64;
    let without_fees = principal * (1.0 + gross_return_percent / 100.0).powf(periods);
    let net_return_percent = gross_return_percent - fee_percent;
    let with_fees = principal * (1.0 + net_return_percent / 100.0).powf(periods);

    FeeImpact {
        without_fees: round_currency(without_fees),
        with_fees: round_currency(with_fees),
        fee_impact: round_currency(without_fees - with_fees),
    }
}

/// Sizes a retirement corpus as 25x the inflated annual expenses at the
/// retirement date. The years spent in retirement do not change the result.
pub fn compute_retirement_goal(
    current_age: u32,
    retirement_age: u32,
    annual_expenses: f64,
    _years_in_retirement: u32,
    inflation_rate_percent: f64,
) -> f64 {
    let years_to_retirement = retirement_age as f64 - current_age as f64;
    let future_expenses =
        annual_expenses * (1.0 + inflation_rate_percent / 100.0).powf(years_to_retirement);

    round_currency(future_expenses * RETIREMENT_EXPENSE_MULTIPLE)
}

/// Monthly payment that, together with `current_savings` growing alongside,
/// reaches `goal` after `years`. Returns 0 when the savings already suffice.
pub fn compute_required_monthly_savings(
    goal: f64,
    years: u32,
    annual_rate_percent: f64,
    current_savings: f64,
) -> f64 {
    let rate = monthly_rate(annual_rate_percent);
    let months = u64::from(years) * u64::from(MONTHS_PER_YEAR);
    let growth = (1.0 + rate).powf(months as f64);

    // 0 * inf is NaN once growth overflows.
    let grown_savings = if current_savings == 0.0 {
        0.0
    } else {
        current_savings * growth
    };
    let remaining_goal = goal - grown_savings;
    if remaining_goal <= 0.0 {
        return 0.0;
    }
    if months == 0 {
        return round_currency(remaining_goal);
    }
    if rate == 0.0 {
        return round_currency(remaining_goal / months as f64);
    }

    round_currency(remaining_goal * (rate / (growth - 1.0)))
}

/// Age-based ("100 minus age") split adjusted for risk tolerance.
pub fn suggest_allocation(age: u32, risk_tolerance: RiskTolerance) -> AllocationSuggestion {
    let base_stocks = 100 - i64::from(age);
    let stocks = (base_stocks + i64::from(risk_tolerance.stock_adjustment()))
        .clamp(MIN_STOCKS, MAX_STOCKS) as i32;
    let bonds = (100 - stocks - 10).max(MIN_BONDS);
    let cash = CASH_TARGET;
    let alternatives = 100 - stocks - bonds - cash;

    normalize_allocation(AllocationSuggestion {
        stocks,
        bonds,
        cash,
        alternatives,
    })
}

fn normalize_allocation(allocation: AllocationSuggestion) -> AllocationSuggestion {
    let total = allocation.total();
    if total == 100 || total <= 0 {
        return allocation;
    }

    let factor = 100.0 / total as f64;
    let scale = |share: i32| round_currency(share as f64 * factor) as i32;
    let stocks = scale(allocation.stocks);
    let bonds = scale(allocation.bonds);
    let alternatives = scale(allocation.alternatives);

    AllocationSuggestion {
        stocks,
        bonds,
        cash: 100 - stocks - bonds - alternatives,
        alternatives,
    }
}
