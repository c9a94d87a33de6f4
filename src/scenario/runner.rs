//! Scenario runner: one call from inputs to every projection the dashboard shows

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::inputs::{ScenarioInputs, PMI_DOWN_PAYMENT_THRESHOLD_PCT};
use crate::analysis::{
    apply_resale_impact, compare_refinance, rent_vs_buy, RefiResult, ResaleResult,
    RentVsBuyResult,
};
use crate::cache::ScheduleCache;
use crate::error::{EngineError, Result};
use crate::loan::ScheduleRow;
use crate::money::round_cents;
use crate::series::{pmi_schedule, tax_savings};

/// Headline numbers for a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Level principal and interest payment, rounded to cents
    pub monthly_pi: f64,

    /// Everything due in month 1: P&I, escrow items, maintenance and PMI, net of tax savings
    pub first_month_total: f64,

    pub total_interest: f64,

    /// Sum of the first twelve months of tax savings, when the deduction is on
    pub first_year_tax_savings: Option<f64>,
}

/// Every output of a scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub principal: f64,
    pub down_payment: f64,
    pub schedule: Arc<[ScheduleRow]>,
    pub pmi: Vec<f64>,
    pub tax_savings: Vec<f64>,

    /// Rent-vs-buy over the whole term
    pub rent_vs_buy_full: RentVsBuyResult,

    /// Rent-vs-buy through the sale month with equity credited, or the full
    /// comparison when resale is off
    pub rent_vs_buy: RentVsBuyResult,

    pub resale: Option<ResaleResult>,
    pub refinance: Option<RefiResult>,
    pub metrics: Metrics,
}

/// Runs scenarios with a fixed PMI policy
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Down payment percentage below which PMI is charged
    pub pmi_down_payment_threshold: f64,

    /// Drop PMI once the balance reaches 80% of the home price
    pub stop_pmi_at_ltv80: bool,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self {
            pmi_down_payment_threshold: PMI_DOWN_PAYMENT_THRESHOLD_PCT,
            stop_pmi_at_ltv80: true,
        }
    }

    /// Validate `inputs`, build the schedule and run every analysis
    pub fn run(&self, inputs: &ScenarioInputs) -> Result<ScenarioResult> {
        inputs.validate()?;
        let schedule: Arc<[ScheduleRow]> = inputs.loan().schedule()?.into();
        self.project(inputs, schedule)
    }

    /// Same as [`run`](Self::run) but reuses schedules already in `cache`
    pub fn run_cached(&self, cache: &mut ScheduleCache, inputs: &ScenarioInputs) -> Result<ScenarioResult> {
        inputs.validate()?;
        let schedule = cache.get_or_build(&inputs.loan())?;
        self.project(inputs, schedule)
    }

    /// Run independent scenarios in parallel; results keep input order
    pub fn run_batch(&self, scenarios: &[ScenarioInputs]) -> Vec<Result<ScenarioResult>> {
        info!("Running {} scenarios", scenarios.len());
        scenarios.par_iter().map(|inputs| self.run(inputs)).collect()
    }

    fn project(&self, inputs: &ScenarioInputs, schedule: Arc<[ScheduleRow]>) -> Result<ScenarioResult> {
        let loan = inputs.loan();
        let first_row = *schedule.first().ok_or_else(|| EngineError::EmptySchedule {
            context: "scenario".to_string(),
        })?;
        debug!(
            "Scenario: principal {:.2} at {}% for {} years, {} rows",
            loan.principal,
            loan.annual_rate_pct,
            loan.years,
            schedule.len()
        );

        let deduction = inputs.tax.deduction_enabled;
        let tax = tax_savings(
            &schedule,
            inputs.tax.marginal_rate_pct,
            inputs.costs.property_tax,
            deduction,
        );
        let pmi = pmi_schedule(
            &schedule,
            inputs.home_price,
            inputs.pmi.annual_rate_pct,
            inputs.down_payment_pct < self.pmi_down_payment_threshold,
            inputs.pmi.exempt,
            self.stop_pmi_at_ltv80,
        );

        let rent_inputs = inputs.rent_inputs();
        let tax_series = deduction.then_some(tax.as_slice());
        let rent_vs_buy_full = rent_vs_buy(&rent_inputs, &schedule, tax_series, Some(&pmi));

        let (resale, working) = if inputs.resale.enabled {
            let resale = apply_resale_impact(
                &schedule,
                inputs.resale.price,
                inputs.resale_date(),
                inputs.resale.selling_cost_pct,
            )?;
            let end = resale.sale_index + 1;
            let mut truncated = rent_vs_buy(
                &rent_inputs,
                &schedule[..end],
                tax_series.map(|s| &s[..end]),
                Some(&pmi[..end]),
            );
            // Equity from the sale offsets what owning cost
            if let Some(last) = truncated.buy.last_mut() {
                *last = round_cents((*last - resale.equity).max(0.0));
            }
            (Some(resale), truncated)
        } else {
            (None, rent_vs_buy_full.clone())
        };

        let refinance = if inputs.refinance.enabled {
            Some(compare_refinance(
                &schedule,
                inputs.refinance.rate_pct,
                inputs.refinance_years(),
                inputs.refinance_start_date(),
                inputs.refinance.closing_costs,
            )?)
        } else {
            None
        };

        let tax_first = if deduction { tax[0] } else { 0.0 };
        let first_month_total = first_row.payment
            + inputs.costs.property_tax
            + inputs.costs.insurance
            + inputs.costs.hoa
            + inputs.maintenance.monthly()
            + pmi[0]
            - tax_first;

        let metrics = Metrics {
            monthly_pi: round_cents(loan.monthly_payment()),
            first_month_total: round_cents(first_month_total),
            total_interest: schedule.last().map(|r| r.cumulative_interest).unwrap_or(0.0),
            first_year_tax_savings: deduction
                .then(|| round_cents(tax.iter().take(12).sum::<f64>())),
        };

        Ok(ScenarioResult {
            principal: loan.principal,
            down_payment: inputs.down_payment(),
            schedule,
            pmi,
            tax_savings: tax,
            rent_vs_buy_full,
            rent_vs_buy: working,
            resale,
            refinance,
            metrics,
        })
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
