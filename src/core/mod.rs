mod demo;
mod engine;
mod error;
mod format;
mod types;

pub use demo::{
    DEMO_BASELINE_VALUE, MAX_DEMO_DAYS, generate_demo_series, generate_demo_series_for_range,
    generate_demo_series_with,
};
pub use engine::{
    DEFAULT_INFLATION_PERCENT, RETIREMENT_EXPENSE_MULTIPLE, compute_fee_impact,
    compute_future_value, compute_required_monthly_savings, compute_retirement_goal, project,
    round_currency, suggest_allocation,
};
pub use error::{InputError, MAX_HORIZON_YEARS};
pub use format::{
    CurrencyFormat, format_compact_currency, format_currency, format_number, format_percent,
};
pub use types::{
    AllocationSuggestion, FeeImpact, ProjectionInput, ProjectionResult, RiskTolerance,
    SyntheticSeriesPoint, TimeRange, YearlySnapshot,
};

pub(crate) use error::{require_finite, require_horizon, require_in_range, require_non_negative};
