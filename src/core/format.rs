//! Number presentation used by the calculator table and the CLI.
//!
//! The engine hands back raw rounded numbers; everything the reader sees
//! as `$2.5M` or `+0.5%` goes through here.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub decimals: usize,
    pub show_sign: bool,
    pub compact: bool,
}

impl CurrencyFormat {
    pub fn compact() -> Self {
        Self {
            compact: true,
            ..Self::default()
        }
    }

    pub fn signed() -> Self {
        Self {
            show_sign: true,
            ..Self::default()
        }
    }
}

/// `$1,234,567`, `-$5`, `+$5.00` depending on `format`.
pub fn format_currency(value: f64, format: CurrencyFormat) -> String {
    if format.compact {
        return format_compact_currency(value);
    }

    let (units, negative) = split_units(value, format.decimals);
    let body = format!("${}", grouped(units, format.decimals));
    with_sign(body, negative, units != 0, format.show_sign)
}

/// `$2.5B`, `$2.5M`, `$250K`, `$999`.
pub fn format_compact_currency(value: f64) -> String {
    let magnitude = value.abs();
    let (scaled, decimals, suffix) = if magnitude >= 1_000_000_000.0 {
        (magnitude / 1_000_000_000.0, 1, "B")
    } else if magnitude >= 1_000_000.0 {
        (magnitude / 1_000_000.0, 1, "M")
    } else if magnitude >= 1_000.0 {
        (magnitude / 1_000.0, 0, "K")
    } else {
        (magnitude, 0, "")
    };

    let (units, _) = split_units(scaled, decimals);
    let sign = if value < 0.0 && units != 0 { "-" } else { "" };
    format!("{sign}${}{suffix}", plain(units, decimals))
}

/// `8.7%`, `-1.2%`, `+0.5%` when `show_sign` is set.
pub fn format_percent(value: f64, decimals: usize, show_sign: bool) -> String {
    let (units, negative) = split_units(value, decimals);
    let body = format!("{}%", plain(units, decimals));
    with_sign(body, negative, units != 0, show_sign)
}

/// Thousands separated, `1,234,567.89`.
pub fn format_number(value: f64, decimals: usize) -> String {
    let (units, negative) = split_units(value, decimals);
    let body = grouped(units, decimals);
    if negative && units != 0 {
        format!("-{body}")
    } else {
        body
    }
}

fn with_sign(body: String, negative: bool, non_zero: bool, show_sign: bool) -> String {
    match (non_zero, negative, show_sign) {
        (true, true, _) => format!("-{body}"),
        (true, false, true) => format!("+{body}"),
        _ => body,
    }
}

// Magnitude in units of 10^-decimals, halves rounded away from zero.
fn split_units(value: f64, decimals: usize) -> (u128, bool) {
    if !value.is_finite() {
        return (0, false);
    }
    let scale = 10f64.powi(decimals as i32);
    let units = (value.abs() * scale).round() as u128;
    (units, value < 0.0)
}

fn plain(units: u128, decimals: usize) -> String {
    let divisor = 10u128.pow(decimals as u32);
    let whole = units / divisor;
    if decimals == 0 {
        return whole.to_string();
    }
    format!("{whole}.{:0>width$}", units % divisor, width = decimals)
}

fn grouped(units: u128, decimals: usize) -> String {
    let divisor = 10u128.pow(decimals as u32);
    let digits = (units / divisor).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + decimals + 1);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if decimals > 0 {
        out.push_str(&format!(".{:0>width$}", units % divisor, width = decimals));
    }
    out
}
