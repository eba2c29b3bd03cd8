//! Pure arithmetic behind the working table and the history list.
//!
//! Nothing here fails: invalid numbers degrade to `0` and `"0"`.

use crate::domain::entities::entry::{Entry, Totals};

pub const DECIMAL_PLACES: usize = 4;
pub const WEIGHT_TOTAL_PLACES: usize = 0;
pub const DETAIL_WEIGHT_PLACES: usize = 2;

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parses user text into a number, treating blank, malformed and non-finite
/// input as `0`.
pub fn parse_numeric(text: &str) -> f64 {
    text.trim().parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// `weight * (percent / 100)`, always finite.
pub fn compute_product(weight: f64, percent: f64) -> f64 {
    if !weight.is_finite() || !percent.is_finite() {
        return 0.0;
    }
    finite_or_zero(weight * (percent / 100.0))
}

/// Sums weights and products in sequence order. Reordering the entries only
/// changes the result within floating point tolerance.
pub fn compute_totals(entries: &[Entry]) -> Totals {
    let mut total_weight = 0.0;
    let mut total_element = 0.0;

    for entry in entries {
        total_weight += finite_or_zero(entry.weight);
        total_element += compute_product(entry.weight, entry.percent);
    }

    let total_weight = finite_or_zero(total_weight);
    let total_element = finite_or_zero(total_element);

    Totals {
        total_weight,
        total_element,
        ratio_percent: ratio_percent(total_weight, total_element),
    }
}

/// Element share of the total weight in percent, `0` when there is no weight.
pub fn ratio_percent(total_weight: f64, total_element: f64) -> f64 {
    if total_weight > 0.0 && total_weight.is_finite() {
        finite_or_zero(total_element / total_weight * 100.0)
    } else {
        0.0
    }
}

/// Fixed-point rendering with trailing zeroes trimmed.
///
/// Rounding follows `format!("{:.N}")`: the exact binary value is rounded and
/// exact ties go to the even digit, so `2.5` at 0 places is `"2"`.
pub fn format_number(value: f64, decimal_places: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let mut text = format!("{value:.decimal_places$}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }

    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}
