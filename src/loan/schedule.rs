//! Amortization engine: month-by-month schedule generation

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::payment::monthly_payment;
use super::Loan;
use crate::calendar::add_months;
use crate::error::Result;
use crate::money::{monthly_rate, round_cents};

/// A single month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Payment number (1-indexed, no gaps)
    pub month: u32,

    /// Payment date, stepped from the loan start date
    pub date: NaiveDate,

    /// Interest charged this month
    pub interest: f64,

    /// Principal repaid this month
    pub principal: f64,

    /// Effective payment: the level payment, or interest + remaining principal on the final row
    pub payment: f64,

    /// Interest paid through this row
    pub cumulative_interest: f64,

    /// Balance after this payment
    pub balance: f64,
}

/// Running state carried between months
#[derive(Debug, Clone)]
struct AmortizationState {
    month: u32,
    balance: f64,
    cumulative_interest: f64,
}

/// Generates amortization schedules for a validated loan
pub struct AmortizationEngine {
    loan: Loan,
    /// Level payment, rounded once to cents
    payment: f64,
    /// Monthly fractional rate
    rate: f64,
}

impl AmortizationEngine {
    /// Create an engine for the given loan, rejecting invalid terms
    pub fn new(loan: Loan) -> Result<Self> {
        loan.validate()?;
        let payment = round_cents(monthly_payment(
            loan.principal,
            loan.annual_rate_pct,
            loan.years,
        ));
        let rate = monthly_rate(loan.annual_rate_pct);
        Ok(Self { loan, payment, rate })
    }

    /// The rounded level payment used for every row but the last
    pub fn level_payment(&self) -> f64 {
        self.payment
    }

    /// Run the schedule until payoff or the end of the term
    pub fn project(&self) -> Vec<ScheduleRow> {
        let term_months = self.loan.term_months();
        let mut rows = Vec::with_capacity(term_months as usize);
        let mut state = AmortizationState {
            month: 0,
            balance: self.loan.principal,
            cumulative_interest: 0.0,
        };

        while state.month < term_months {
            state.month += 1;
            let final_month = state.month == term_months;
            let row = self.calculate_month(&mut state, final_month);
            rows.push(row);

            if state.balance <= 0.0 {
                break;
            }
        }

        debug!(
            "Built {} of {} scheduled rows for principal {:.2} at {}%",
            rows.len(),
            term_months,
            self.loan.principal,
            self.loan.annual_rate_pct
        );
        rows
    }

    /// Compute one row and advance the running state
    fn calculate_month(&self, state: &mut AmortizationState, final_month: bool) -> ScheduleRow {
        let interest = round_cents(state.balance * self.rate);
        let mut principal_paid = round_cents(self.payment - interest);
        let mut payment = self.payment;

        // Overshoot on the last payment, or leftover rounding drift at the end of the term
        if principal_paid > state.balance || final_month {
            let drift = state.balance - principal_paid;
            if final_month && drift > 0.01 {
                warn!("Final row absorbs {:.2} of rounding drift", drift);
            } else if final_month && drift > 0.0 {
                debug!("Final row absorbs {:.2} of rounding drift", drift);
            }
            principal_paid = round_cents(state.balance);
            payment = round_cents(interest + principal_paid);
        }

        state.balance = round_cents(state.balance - principal_paid).max(0.0);
        state.cumulative_interest = round_cents(state.cumulative_interest + interest);

        ScheduleRow {
            month: state.month,
            date: add_months(self.loan.start_date, state.month as i32 - 1),
            interest,
            principal: principal_paid,
            payment,
            cumulative_interest: state.cumulative_interest,
            balance: state.balance,
        }
    }
}

/// Produce the full amortization schedule for a fixed-rate loan
pub fn build_schedule(
    principal: f64,
    annual_rate_pct: f64,
    years: u32,
    start_date: NaiveDate,
) -> Result<Vec<ScheduleRow>> {
    let loan = Loan::new(principal, annual_rate_pct, years, start_date);
    Ok(AmortizationEngine::new(loan)?.project())
}

/// Index of the first row dated on or after `target`, if any
pub fn first_on_or_after(schedule: &[ScheduleRow], target: NaiveDate) -> Option<usize> {
    schedule.iter().position(|row| row.date >= target)
}

/// Lifetime totals for a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_months: u32,
    pub total_paid: f64,
    pub total_principal: f64,
    pub total_interest: f64,
    pub final_balance: f64,
    pub payoff_date: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn from_rows(schedule: &[ScheduleRow]) -> Self {
        let total_paid = schedule.iter().map(|r| r.payment).sum::<f64>();
        let total_principal = schedule.iter().map(|r| r.principal).sum::<f64>();

        Self {
            total_months: schedule.len() as u32,
            total_paid: round_cents(total_paid),
            total_principal: round_cents(total_principal),
            total_interest: schedule.last().map(|r| r.cumulative_interest).unwrap_or(0.0),
            final_balance: schedule.last().map(|r| r.balance).unwrap_or(0.0),
            payoff_date: schedule.last().map(|r| r.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn assert_schedule_invariants(schedule: &[ScheduleRow], years: u32) {
        assert!(!schedule.is_empty());
        assert!(schedule.len() <= (years * 12) as usize);
        assert_abs_diff_eq!(schedule.last().unwrap().balance, 0.0, epsilon = 0.01);

        for (i, row) in schedule.iter().enumerate() {
            assert_eq!(row.month as usize, i + 1);
            assert!(row.balance >= 0.0);
            if i > 0 {
                assert!(row.balance <= schedule[i - 1].balance);
                assert!(row.cumulative_interest >= schedule[i - 1].cumulative_interest);
            }
        }
    }

    #[test]
    fn test_thirty_year_schedule() {
        let schedule = build_schedule(240_000.0, 6.5, 30, start()).unwrap();
        assert_eq!(schedule.len(), 360);
        assert_schedule_invariants(&schedule, 30);

        // 240000 * 0.065 / 12 = 1300.00
        assert_eq!(schedule[0].interest, 1300.0);
        assert_eq!(schedule[0].payment, 1516.96);
        assert_abs_diff_eq!(schedule[0].principal, 216.96, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule[0].balance, 239_783.04, epsilon = 1e-9);
        assert_eq!(schedule[359].date, NaiveDate::from_ymd_opt(2053, 12, 1).unwrap());
    }

    #[test]
    fn test_first_row_values_small_loan() {
        let schedule = build_schedule(100_000.0, 6.5, 30, start()).unwrap();
        let first = &schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.date, start());
        assert_eq!(first.payment, 632.07);
        assert_eq!(first.interest, 541.67);
        assert_abs_diff_eq!(first.principal, 90.40, epsilon = 1e-9);
        assert_abs_diff_eq!(first.cumulative_interest, 541.67, epsilon = 1e-9);
    }

    #[test]
    fn test_invariants_across_terms() {
        for &(principal, rate, years) in &[
            (100_000.0, 6.5, 30),
            (350_000.0, 3.25, 15),
            (50_000.0, 0.0, 10),
            (1_000.0, 12.0, 1),
            (425_000.0, 9.99, 20),
        ] {
            let schedule = build_schedule(principal, rate, years, start()).unwrap();
            assert_schedule_invariants(&schedule, years);

            let repaid: f64 = schedule.iter().map(|r| r.principal).sum();
            assert_abs_diff_eq!(repaid, principal, epsilon = 0.01);
        }
    }

    #[test]
    fn test_zero_rate_final_row_absorbs_rounding() {
        // 100000 / 360 = 277.777..., rounded up to 277.78 each month
        let schedule = build_schedule(100_000.0, 0.0, 30, start()).unwrap();
        assert_schedule_invariants(&schedule, 30);
        assert!(schedule.iter().all(|r| r.interest == 0.0));
        assert_eq!(schedule.last().unwrap().cumulative_interest, 0.0);

        let last = schedule.last().unwrap();
        assert!(last.payment < 277.78);
        assert_abs_diff_eq!(last.payment, last.principal, epsilon = 1e-9);
    }

    #[test]
    fn test_final_payment_is_interest_plus_remaining_principal() {
        let schedule = build_schedule(180_000.0, 5.75, 25, start()).unwrap();
        let last = schedule.last().unwrap();
        let previous = &schedule[schedule.len() - 2];
        assert_abs_diff_eq!(last.principal, previous.balance, epsilon = 1e-9);
        assert_abs_diff_eq!(last.payment, last.interest + last.principal, epsilon = 0.005);
    }

    #[test]
    fn test_half_cent_boundary_follows_exact_value() {
        // Balance 116438.25 at 8%: interest is 776.2549999..., stored as 776.25
        let schedule = build_schedule(117_592.06, 8.0, 30, start()).unwrap();
        assert_eq!(schedule[13].balance, 116_438.25);
        assert_eq!(schedule[14].interest, 776.25);
        assert_schedule_invariants(&schedule, 30);
    }

    #[test]
    fn test_one_year_term_ends_at_zero() {
        let schedule = build_schedule(1_000.0, 6.0, 1, start()).unwrap();
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[11].balance, 0.0);
        assert_eq!(schedule[11].month, 12);
    }

    #[test]
    fn test_invalid_terms_rejected() {
        assert!(build_schedule(0.0, 6.5, 30, start()).is_err());
        assert!(build_schedule(-5.0, 6.5, 30, start()).is_err());
        assert!(build_schedule(100_000.0, 6.5, 0, start()).is_err());
        assert!(build_schedule(100_000.0, -1.0, 30, start()).is_err());
        assert!(build_schedule(f64::NAN, 6.5, 30, start()).is_err());
        assert!(build_schedule(100_000.0, 6.5, 400_000_000, start()).is_err());
        assert!(build_schedule(100_000.0, 6.5, crate::loan::MAX_TERM_YEARS + 1, start()).is_err());
    }

    #[test]
    fn test_first_on_or_after() {
        let schedule = build_schedule(100_000.0, 6.5, 1, start()).unwrap();
        let mid = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(first_on_or_after(&schedule, mid), Some(3));
        assert_eq!(first_on_or_after(&schedule, start()), Some(0));
        let late = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(first_on_or_after(&schedule, late), None);
    }

    #[test]
    fn test_summary() {
        let schedule = build_schedule(100_000.0, 6.5, 30, start()).unwrap();
        let summary = ScheduleSummary::from_rows(&schedule);
        assert_eq!(summary.total_months, 360);
        assert_abs_diff_eq!(summary.total_principal, 100_000.0, epsilon = 0.01);
        assert_abs_diff_eq!(
            summary.total_paid,
            summary.total_principal + summary.total_interest,
            epsilon = 0.05
        );
        assert_eq!(summary.final_balance, 0.0);
        assert_eq!(summary.payoff_date, Some(NaiveDate::from_ymd_opt(2053, 12, 1).unwrap()));
    }
}
