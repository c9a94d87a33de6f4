//! Currency rounding shared by every stored monetary value

/// Round to currency precision (cents).
///
/// Rounds the exact binary value of `amount`, so 776.2549999... stays at
/// 776.25 even though `amount * 100.0` lands on 77625.5. Exact half-cent ties
/// go to the even cent.
pub fn round_cents(amount: f64) -> f64 {
    if !amount.is_finite() {
        return amount;
    }

    let scaled = amount * 100.0;
    // Exact error of the multiplication: amount * 100 == scaled + residual
    let residual = amount.mul_add(100.0, -scaled);
    let floor = scaled.floor();
    let fraction = scaled - floor;

    let cents = if fraction > 0.5 {
        floor + 1.0
    } else if fraction < 0.5 {
        floor
    } else if residual > 0.0 {
        floor + 1.0
    } else if residual < 0.0 || floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };

    let rounded = cents / 100.0;
    // Avoid emitting -0.0 for tiny negative residues
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Convert an annual percentage (6.5 for 6.5%) into a monthly fractional rate
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / 12.0
}
