//! Cumulative cost of renting versus owning over a schedule slice

use log::warn;
use serde::{Deserialize, Serialize};

use crate::loan::ScheduleRow;
use crate::money::round_cents;

/// Rent path and fixed ownership costs for the comparison
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentInputs {
    /// Starting monthly rent
    pub rent: f64,
    /// Annual rent growth in percent, applied every 12 months
    pub rent_growth_pct: f64,
    pub maintenance_monthly: f64,
    pub taxes_monthly: f64,
    pub insurance_monthly: f64,
    pub hoa_monthly: f64,
}

impl RentInputs {
    /// Ownership costs that do not depend on the loan
    pub fn fixed_ownership_monthly(&self) -> f64 {
        self.taxes_monthly + self.insurance_monthly + self.hoa_monthly + self.maintenance_monthly
    }
}

/// Parallel cumulative cost series, one entry per schedule row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentVsBuyResult {
    pub rent: Vec<f64>,
    pub buy: Vec<f64>,
}

impl RentVsBuyResult {
    pub fn len(&self) -> usize {
        self.rent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rent.is_empty()
    }

    /// Final cumulative (rent, buy) totals
    pub fn final_totals(&self) -> Option<(f64, f64)> {
        Some((*self.rent.last()?, *self.buy.last()?))
    }

    /// First 1-based month where renting has cost more than owning, if ever
    pub fn break_even_month(&self) -> Option<u32> {
        self.rent
            .iter()
            .zip(&self.buy)
            .position(|(rent, buy)| rent > buy)
            .map(|i| i as u32 + 1)
    }
}

/// Compare cumulative renting and owning costs across `schedule`.
///
/// `schedule` may be a prefix of a full schedule (e.g. truncated at a sale).
/// PMI is added and tax savings subtracted month by month when provided; a
/// missing series, or one shorter than the slice, contributes nothing.
pub fn rent_vs_buy(
    inputs: &RentInputs,
    schedule: &[ScheduleRow],
    tax_savings: Option<&[f64]>,
    pmi: Option<&[f64]>,
) -> RentVsBuyResult {
    for (name, series) in [("tax savings", tax_savings), ("PMI", pmi)] {
        if let Some(series) = series {
            if series.len() < schedule.len() {
                warn!(
                    "{} series has {} entries for {} rows; missing months count as zero",
                    name,
                    series.len(),
                    schedule.len()
                );
            }
        }
    }

    let growth = inputs.rent_growth_pct / 100.0;
    let fixed_costs = inputs.fixed_ownership_monthly();

    let mut rent = inputs.rent;
    let mut cum_rent = 0.0;
    let mut cum_buy = 0.0;
    let mut result = RentVsBuyResult {
        rent: Vec::with_capacity(schedule.len()),
        buy: Vec::with_capacity(schedule.len()),
    };

    for (i, row) in schedule.iter().enumerate() {
        // Rent steps up before months 13, 25, 37, ...
        if i > 0 && i % 12 == 0 {
            rent *= 1.0 + growth;
        }
        cum_rent += rent;
        result.rent.push(round_cents(cum_rent));

        let pmi_charge = pmi.and_then(|s| s.get(i)).copied().unwrap_or(0.0);
        let tax_saving = tax_savings.and_then(|s| s.get(i)).copied().unwrap_or(0.0);
        cum_buy += row.payment + fixed_costs + pmi_charge - tax_saving;
        result.buy.push(round_cents(cum_buy));
    }

    result
}
