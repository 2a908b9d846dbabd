//! Synthetic portfolio history for the demo client dashboard.
//!
//! The values are illustrative only. Callers may rely on the shape of the
//! series (length, date ordering, positive values) but never on the numbers.

use chrono::{Days, Local, NaiveDate};
use rand::Rng;

use super::engine::round_currency;
use super::types::{SyntheticSeriesPoint, TimeRange};

pub const DEMO_BASELINE_VALUE: f64 = 2_500_000.0;

/// Longest window, in days, any generator call will produce.
pub const MAX_DEMO_DAYS: u32 = 3_650;

// Daily change is (u - 0.4) * 2.5 percent for u in [0, 1): -1.0% .. +1.5%.
const CHANGE_SHIFT: f64 = 0.4;
const CHANGE_SPREAD_PERCENT: f64 = 2.5;

pub fn generate_demo_series(days: u32) -> Vec<SyntheticSeriesPoint> {
    let today = Local::now().date_naive();
    generate_demo_series_with(days, today, &mut rand::rng())
}

pub fn generate_demo_series_for_range(range: TimeRange) -> Vec<SyntheticSeriesPoint> {
    generate_demo_series(range.days())
}

/// Produces one point per day from `today - days` through `today`, oldest
/// first. `days` is capped at [`MAX_DEMO_DAYS`], and the window starts no
/// earlier than the first representable date.
pub fn generate_demo_series_with<R: Rng>(
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<SyntheticSeriesPoint> {
    let days = days.min(MAX_DEMO_DAYS);
    let start = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);

    let mut points = Vec::with_capacity(days as usize + 1);
    let mut value = DEMO_BASELINE_VALUE;

    for date in start.iter_days().take_while(|date| *date <= today) {
        let change_percent = (rng.random::<f64>() - CHANGE_SHIFT) * CHANGE_SPREAD_PERCENT;
        value *= 1.0 + change_percent / 100.0;

        points.push(SyntheticSeriesPoint {
            date,
            value: round_currency(value),
            change_percent,
        });
    }

    points
}
