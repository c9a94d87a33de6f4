//! Closed-form level payment for a fixed-rate loan

use crate::money::monthly_rate;

/// Standard fixed-rate mortgage payment (principal and interest only).
///
/// A zero rate degrades to straight-line repayment `principal / (years * 12)`.
/// The result is not rounded; callers round where they store it.
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, years: u32) -> f64 {
    let r = monthly_rate(annual_rate_pct);
    let n = f64::from(years) * 12.0;

    if r == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + r).powf(n);
    principal * (r * growth) / (growth - 1.0)
}
