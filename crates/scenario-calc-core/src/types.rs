use rust_decimal::Decimal;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples (e.g., 8.5x EV/EBITDA)
pub type Multiple = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Raises `base` to a non-negative integer exponent via iterative
/// multiplication, for the handful of call sites (contract escalations)
/// that only ever need a whole-number power.
pub fn decimal_powu(base: Decimal, exponent: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..exponent {
        result *= base;
    }
    result
}
