//! Continue the current loan or refinance the remaining balance

use std::fmt;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loan::{first_on_or_after, Loan, ScheduleRow};
use crate::money::round_cents;

/// Verdict of a refinance comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefiConclusion {
    /// Refinancing costs less than the remaining interest on the current loan
    Saves,
    /// Refinancing costs the same or more
    CostsMore,
    /// Nothing to compare
    Neutral,
}

impl RefiConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefiConclusion::Saves => "Refi saves money",
            RefiConclusion::CostsMore => "Refi costs more",
            RefiConclusion::Neutral => "-",
        }
    }
}

impl fmt::Display for RefiConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing the current loan path against a refinance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefiResult {
    /// 0-based index of the first current-schedule row replaced by the new loan
    pub rebase_index: usize,

    /// Balance carried into the new loan
    pub remaining_balance: f64,

    /// Interest still owed on the current loan from the rebase point
    pub current_interest: f64,

    /// Total interest on the new loan plus closing costs
    pub refi_interest: f64,

    /// `current_interest - refi_interest`; positive means refinancing saves
    pub difference: f64,

    pub conclusion: RefiConclusion,

    /// Terms of the new loan, `None` when there was nothing to refinance
    pub refi_loan: Option<Loan>,

    /// Schedule of the new loan
    pub refi_schedule: Vec<ScheduleRow>,
}

impl RefiResult {
    /// Zeroed result for an empty current schedule
    pub fn neutral() -> Self {
        Self {
            rebase_index: 0,
            remaining_balance: 0.0,
            current_interest: 0.0,
            refi_interest: 0.0,
            difference: 0.0,
            conclusion: RefiConclusion::Neutral,
            refi_loan: None,
            refi_schedule: Vec::new(),
        }
    }

    /// 1-based payment number at which the refinance takes over
    pub fn rebase_month(&self) -> u32 {
        self.rebase_index as u32 + 1
    }
}

/// Compare finishing the current loan against refinancing from `refi_start_date`.
///
/// The rebase index is the first row dated on or after the refinance date (the
/// last row if none). The carried balance is the balance just before that row;
/// at index 0 it is row 0's ending balance, not the original principal.
pub fn compare_refinance(
    current_schedule: &[ScheduleRow],
    refi_rate_pct: f64,
    refi_years: u32,
    refi_start_date: NaiveDate,
    closing_costs: f64,
) -> Result<RefiResult> {
    let Some(last) = current_schedule.last() else {
        return Ok(RefiResult::neutral());
    };

    let rebase_index = first_on_or_after(current_schedule, refi_start_date).unwrap_or_else(|| {
        warn!(
            "Refinance date {} is after the final payment; rebasing at the last row",
            refi_start_date
        );
        current_schedule.len() - 1
    });

    let (prior_cumulative_interest, remaining_balance) = match rebase_index {
        0 => (0.0, current_schedule[0].balance),
        idx => {
            let prior = &current_schedule[idx - 1];
            (prior.cumulative_interest, prior.balance)
        }
    };
    let current_interest = round_cents(last.cumulative_interest - prior_cumulative_interest);

    let (refi_loan, refi_schedule) = if remaining_balance > 0.0 {
        let loan = Loan::new(remaining_balance, refi_rate_pct, refi_years, refi_start_date);
        (Some(loan), loan.schedule()?)
    } else {
        (None, Vec::new())
    };
    let new_interest = refi_schedule
        .last()
        .map(|row| row.cumulative_interest)
        .unwrap_or(0.0);
    let refi_interest = round_cents(new_interest + closing_costs);

    let difference = round_cents(current_interest - refi_interest);
    let conclusion = if difference > 0.0 {
        RefiConclusion::Saves
    } else {
        RefiConclusion::CostsMore
    };
    debug!(
        "Refinance at index {}: balance {:.2}, current {:.2} vs refi {:.2}",
        rebase_index, remaining_balance, current_interest, refi_interest
    );

    Ok(RefiResult {
        rebase_index,
        remaining_balance: round_cents(remaining_balance),
        current_interest,
        refi_interest,
        difference,
        conclusion,
        refi_loan,
        refi_schedule,
    })
}
