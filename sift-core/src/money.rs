//! Money helpers. Amounts are `f64` with two-decimal precision.

/// Two amounts closer than this are treated as equal.
pub const CENT_TOLERANCE: f64 = 0.01;

/// Round to two decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Equality within one cent, absorbing binary float noise.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= CENT_TOLERANCE + 1e-9
}
