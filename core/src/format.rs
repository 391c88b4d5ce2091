//! Display helpers. Non-finite values render as a placeholder instead of `NaN`/`inf`.

use std::f64::consts::{PI, TAU};

pub const PLACEHOLDER: &str = "—";

pub fn fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.*}", decimals, value)
}

/// Mantissa/exponent form, e.g. `5.97×10^24`, with `significant` digits.
pub fn scientific(value: f64, significant: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let mut exponent = value.abs().log10().floor() as i32;
    let decimals = significant.saturating_sub(1);
    let mut mantissa = shift_decimal(value, exponent);
    // 9.996 at 3 significant digits rounds up to 10.0
    let rounded: f64 = format!("{:.*}", decimals, mantissa).parse().unwrap_or(mantissa);
    if rounded.abs() >= 10.0 {
        exponent += 1;
        mantissa = shift_decimal(value, exponent);
    }
    if !mantissa.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.*}×10^{}", decimals, mantissa, exponent)
}

/// `value / 10^exponent` in two halves; `10^-324` alone underflows to zero.
fn shift_decimal(value: f64, exponent: i32) -> f64 {
    let half = exponent / 2;
    value / 10f64.powi(half) / 10f64.powi(exponent - half)
}

/// Phase as a reduced multiple of π/4 after normalising into `[0, 2π)`.
pub fn pi_fraction(radians: f64) -> String {
    if !radians.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let step = PI / 4.0;
    let n = (radians.rem_euclid(TAU) / step).round() as u32;
    match n {
        0 => return "0".to_string(),
        8 => return "2π".to_string(),
        _ => {}
    }

    let divisor = gcd(n, 4);
    let (num, den) = (n / divisor, 4 / divisor);
    match (num, den) {
        (1, 1) => "π".to_string(),
        (p, 1) => format!("{}π", p),
        (1, q) => format!("π/{}", q),
        (p, q) => format!("{}π/{}", p, q),
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
