use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be >= 0")]
    Negative { field: &'static str },

    #[error("years must be >= 1, got {years}")]
    HorizonTooShort { years: u32 },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("retirementAge ({retirement}) must be >= currentAge ({current})")]
    AgeOrder { current: u32, retirement: u32 },

    #[error("unknown risk tolerance '{0}', expected conservative, moderate or aggressive")]
    UnknownRiskTolerance(String),

    #[error("unknown time range '{0}', expected 1M, 3M, 6M, 1Y or All")]
    UnknownTimeRange(String),
}

/// Longest projection horizon accepted at any entry point.
pub const MAX_HORIZON_YEARS: u32 = 100;

pub(crate) fn require_horizon(years: u32) -> Result<u32, InputError> {
    if years == 0 {
        return Err(InputError::HorizonTooShort { years });
    }
    if years > MAX_HORIZON_YEARS {
        return Err(InputError::OutOfRange {
            field: "years",
            min: 1.0,
            max: MAX_HORIZON_YEARS as f64,
        });
    }
    Ok(years)
}

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { field })
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    let value = require_finite(field, value)?;
    if value < 0.0 {
        return Err(InputError::Negative { field });
    }
    Ok(value)
}

pub(crate) fn require_in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, InputError> {
    let value = require_finite(field, value)?;
    if !(min..=max).contains(&value) {
        return Err(InputError::OutOfRange { field, min, max });
    }
    Ok(value)
}
