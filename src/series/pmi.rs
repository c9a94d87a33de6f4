//! Private mortgage insurance charges aligned to a schedule

use log::debug;

use crate::loan::ScheduleRow;
use crate::money::round_cents;

/// Loan-to-value ratio at which PMI is dropped
pub const PMI_CANCEL_LTV: f64 = 0.80;

/// Monthly PMI charge for every schedule row.
///
/// The charge is `annual_rate_pct% * original principal / 12`, with the
/// original principal rebuilt from the first row. It stays constant until the
/// balance falls to 80% of `home_price` (when `stop_at_ltv80` is set) and is
/// zero from that row on.
pub fn pmi_schedule(
    schedule: &[ScheduleRow],
    home_price: f64,
    annual_rate_pct: f64,
    enabled: bool,
    exempt: bool,
    stop_at_ltv80: bool,
) -> Vec<f64> {
    if !enabled || exempt || annual_rate_pct <= 0.0 || schedule.is_empty() {
        return vec![0.0; schedule.len()];
    }

    let first = &schedule[0];
    let original_principal = first.balance + first.principal;
    let monthly_charge = round_cents(annual_rate_pct / 100.0 * original_principal / 12.0);
    let ltv_threshold = PMI_CANCEL_LTV * home_price;

    let mut cancelled = false;
    let charges: Vec<f64> = schedule
        .iter()
        .map(|row| {
            if stop_at_ltv80 && !cancelled && row.balance <= ltv_threshold {
                cancelled = true;
                debug!("PMI cancelled at month {} (balance {:.2})", row.month, row.balance);
            }
            if cancelled {
                0.0
            } else {
                monthly_charge
            }
        })
        .collect();

    charges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::build_schedule;
    use chrono::NaiveDate;

    fn schedule(principal: f64) -> Vec<ScheduleRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        build_schedule(principal, 6.5, 30, start).unwrap()
    }

    #[test]
    fn test_zeros_when_not_applicable() {
        let rows = schedule(285_000.0);
        for pmi in [
            pmi_schedule(&rows, 300_000.0, 0.6, false, false, true),
            pmi_schedule(&rows, 300_000.0, 0.6, true, true, true),
            pmi_schedule(&rows, 300_000.0, 0.0, true, false, true),
            pmi_schedule(&rows, 300_000.0, -0.5, true, false, true),
        ] {
            assert_eq!(pmi.len(), rows.len());
            assert!(pmi.iter().all(|&c| c == 0.0));
        }
        assert!(pmi_schedule(&[], 300_000.0, 0.6, true, false, true).is_empty());
    }

    #[test]
    fn test_charge_from_original_principal() {
        // 5% down on 300000: 0.6% * 285000 / 12 = 142.50
        let rows = schedule(285_000.0);
        let pmi = pmi_schedule(&rows, 300_000.0, 0.6, true, false, true);
        assert_eq!(pmi[0], 142.5);
    }

    #[test]
    fn test_stops_at_eighty_percent_ltv() {
        let rows = schedule(285_000.0);
        let pmi = pmi_schedule(&rows, 300_000.0, 0.6, true, false, true);

        let cutoff = rows.iter().position(|r| r.balance <= 240_000.0).unwrap();
        assert!(cutoff > 0);
        assert!(pmi[..cutoff].iter().all(|&c| c == 142.5));
        assert!(pmi[cutoff..].iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_without_ltv_gate_runs_full_term() {
        let rows = schedule(285_000.0);
        let pmi = pmi_schedule(&rows, 300_000.0, 0.6, true, false, false);
        assert!(pmi.iter().all(|&c| c == 142.5));
    }

    #[test]
    fn test_already_below_threshold() {
        // 20% down never pays PMI with the gate on
        let rows = schedule(240_000.0);
        let pmi = pmi_schedule(&rows, 300_000.0, 0.6, true, false, true);
        assert!(pmi.iter().all(|&c| c == 0.0));
    }
}
