//! Approximate monthly tax savings from the mortgage interest and property tax deduction

use crate::loan::ScheduleRow;
use crate::money::round_cents;

/// Monthly tax savings aligned to the schedule.
///
/// Each entry is `(interest + monthly_property_tax) * tax_rate_pct%`. This is a
/// rough deduction benefit only: no brackets, standard deduction or caps.
pub fn tax_savings(
    schedule: &[ScheduleRow],
    tax_rate_pct: f64,
    monthly_property_tax: f64,
    enabled: bool,
) -> Vec<f64> {
    if !enabled || tax_rate_pct <= 0.0 {
        return vec![0.0; schedule.len()];
    }

    let rate = tax_rate_pct / 100.0;
    schedule
        .iter()
        .map(|row| round_cents((row.interest + monthly_property_tax) * rate))
        .collect()
}
