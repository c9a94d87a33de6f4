//! Equity realized when the property is sold partway through the loan

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::loan::{first_on_or_after, ScheduleRow};
use crate::money::round_cents;

/// Outcome of selling at a given date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResaleResult {
    /// 0-based schedule index at which the sale occurs
    pub sale_index: usize,
    pub resale_price: f64,
    pub selling_costs: f64,
    pub net_proceeds: f64,
    /// Loan balance outstanding at the sale index
    pub balance: f64,
    /// Net proceeds minus balance; negative when the sale does not cover the loan
    pub equity: f64,
}

impl ResaleResult {
    /// Whether the sale leaves the owner owing money
    pub fn is_underwater(&self) -> bool {
        self.equity < 0.0
    }
}

/// Locate the sale month and compute net equity.
///
/// The sale index is the first row dated on or after `resale_date`, or the
/// last row when the date is past the end of the schedule.
pub fn apply_resale_impact(
    schedule: &[ScheduleRow],
    resale_price: f64,
    resale_date: NaiveDate,
    selling_cost_pct: f64,
) -> Result<ResaleResult> {
    let last_index = schedule
        .len()
        .checked_sub(1)
        .ok_or_else(|| EngineError::EmptySchedule {
            context: "resale impact".to_string(),
        })?;

    let sale_index = first_on_or_after(schedule, resale_date).unwrap_or_else(|| {
        warn!(
            "Resale date {} is after the final payment; selling at the last row",
            resale_date
        );
        last_index
    });
    debug!("Resale at index {} ({})", sale_index, schedule[sale_index].date);

    let balance = schedule[sale_index].balance;
    let selling_costs = round_cents(resale_price * (selling_cost_pct / 100.0));
    let net_proceeds = round_cents(resale_price - selling_costs);
    let equity = round_cents(net_proceeds - balance);

    Ok(ResaleResult {
        sale_index,
        resale_price: round_cents(resale_price),
        selling_costs,
        net_proceeds,
        balance: round_cents(balance),
        equity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::build_schedule;
    use approx::assert_abs_diff_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rows() -> Vec<ScheduleRow> {
        build_schedule(240_000.0, 6.5, 30, ymd(2024, 1, 1)).unwrap()
    }

    #[test]
    fn test_sale_after_ten_years() {
        let rows = rows();
        let result = apply_resale_impact(&rows, 400_000.0, ymd(2034, 1, 1), 6.0).unwrap();

        assert_eq!(result.sale_index, 120);
        assert_eq!(result.selling_costs, 24_000.0);
        assert_eq!(result.net_proceeds, 376_000.0);
        assert_eq!(result.balance, rows[120].balance);
        assert_abs_diff_eq!(result.equity, 376_000.0 - rows[120].balance, epsilon = 0.005);
        assert!(!result.is_underwater());
    }

    #[test]
    fn test_mid_month_date_rounds_forward() {
        let rows = rows();
        let result = apply_resale_impact(&rows, 300_000.0, ymd(2024, 2, 15), 6.0).unwrap();
        assert_eq!(result.sale_index, 2);
    }

    #[test]
    fn test_date_past_end_uses_last_row() {
        let rows = rows();
        let result = apply_resale_impact(&rows, 300_000.0, ymd(2080, 1, 1), 5.0).unwrap();
        assert_eq!(result.sale_index, rows.len() - 1);
        assert_eq!(result.balance, 0.0);
        assert_eq!(result.equity, result.net_proceeds);
    }

    #[test]
    fn test_underwater_sale() {
        // Sell in month 1 for less than the loan plus costs
        let rows = rows();
        let result = apply_resale_impact(&rows, 230_000.0, ymd(2020, 1, 1), 6.0).unwrap();
        assert_eq!(result.sale_index, 0);
        assert!(result.equity < 0.0);
        assert!(result.is_underwater());
        assert_abs_diff_eq!(
            result.equity,
            result.net_proceeds - result.balance,
            epsilon = 0.005
        );
    }

    #[test]
    fn test_negative_equity_at_schedule_end_of_prefix() {
        // Sale at the end of a truncated slice with price below balance + costs
        let rows = rows();
        let slice = &rows[..24];
        let last_balance = slice[23].balance;
        let result = apply_resale_impact(slice, last_balance, ymd(2099, 1, 1), 6.0).unwrap();
        assert_eq!(result.sale_index, 23);
        assert!(result.equity < 0.0);
    }

    #[test]
    fn test_empty_schedule_is_an_error() {
        let err = apply_resale_impact(&[], 300_000.0, ymd(2030, 1, 1), 6.0).unwrap_err();
        assert!(matches!(err, EngineError::EmptySchedule { .. }));
    }
}
