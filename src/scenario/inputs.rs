//! Typed scenario configuration consumed by the runner
//!
//! Every group carries the dashboard defaults so that partial JSON files
//! only need the fields that differ.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::RentInputs;
use crate::calendar::add_months;
use crate::error::{EngineError, Result};
use crate::loan::{Loan, MAX_TERM_YEARS};
use crate::report::PageSize;

/// Down payment percentage below which PMI is charged
pub const PMI_DOWN_PAYMENT_THRESHOLD_PCT: f64 = 20.0;

/// Months from loan start to the default resale date
const DEFAULT_RESALE_HORIZON_MONTHS: i32 = 120;

fn default_home_price() -> f64 { 300_000.0 }
fn default_down_pct() -> f64 { 20.0 }
fn default_rate() -> f64 { 6.5 }
fn default_years() -> u32 { 30 }

/// Fixed monthly ownership costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyCosts {
    pub property_tax: f64,
    pub insurance: f64,
    pub hoa: f64,
}

impl Default for MonthlyCosts {
    fn default() -> Self {
        Self {
            property_tax: 300.0,
            insurance: 100.0,
            hoa: 50.0,
        }
    }
}

/// Annual maintenance budget by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceBudget {
    pub roof: f64,
    pub hvac: f64,
    pub plumbing: f64,
    pub appliances: f64,
    pub lawn: f64,
    pub upgrades: f64,
    pub other: f64,
}

impl Default for MaintenanceBudget {
    fn default() -> Self {
        Self {
            roof: 500.0,
            hvac: 400.0,
            plumbing: 200.0,
            appliances: 300.0,
            lawn: 200.0,
            upgrades: 500.0,
            other: 100.0,
        }
    }
}

impl MaintenanceBudget {
    /// Budget with everything booked under "other"
    pub fn lump_sum(annual: f64) -> Self {
        Self {
            roof: 0.0,
            hvac: 0.0,
            plumbing: 0.0,
            appliances: 0.0,
            lawn: 0.0,
            upgrades: 0.0,
            other: annual,
        }
    }

    /// (category, annual amount) pairs in display order
    pub fn categories(&self) -> [(&'static str, f64); 7] {
        [
            ("roof", self.roof),
            ("hvac", self.hvac),
            ("plumbing", self.plumbing),
            ("appliances", self.appliances),
            ("lawn", self.lawn),
            ("upgrades", self.upgrades),
            ("other", self.other),
        ]
    }

    pub fn annual_total(&self) -> f64 {
        self.categories().iter().map(|(_, amount)| amount).sum()
    }

    pub fn monthly(&self) -> f64 {
        self.annual_total() / 12.0
    }
}

/// Rent path used for the rent-vs-buy comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentAssumptions {
    pub monthly_rent: f64,
    pub annual_growth_pct: f64,
}

impl Default for RentAssumptions {
    fn default() -> Self {
        Self {
            monthly_rent: 1200.0,
            annual_growth_pct: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PmiSettings {
    /// Annual PMI rate as a percent of the original loan
    pub annual_rate_pct: f64,
    pub exempt: bool,
}

impl Default for PmiSettings {
    fn default() -> Self {
        Self {
            annual_rate_pct: 0.6,
            exempt: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    pub deduction_enabled: bool,
    pub marginal_rate_pct: f64,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            deduction_enabled: false,
            marginal_rate_pct: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResaleSettings {
    pub enabled: bool,
    pub price: f64,
    /// Sale date; ten years after the loan start when absent
    pub date: Option<NaiveDate>,
    pub selling_cost_pct: f64,
}

impl Default for ResaleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            price: 400_000.0,
            date: None,
            selling_cost_pct: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinanceSettings {
    pub enabled: bool,
    pub rate_pct: f64,
    /// New term; the current loan's term when absent
    pub years: Option<u32>,
    /// Refinance date; the loan start date when absent
    pub start_date: Option<NaiveDate>,
    pub closing_costs: f64,
}

impl Default for RefinanceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_pct: 6.0,
            years: None,
            start_date: None,
            closing_costs: 3000.0,
        }
    }
}

/// Complete input set for one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    #[serde(default = "default_home_price")]
    pub home_price: f64,

    #[serde(default = "default_down_pct")]
    pub down_payment_pct: f64,

    #[serde(default = "default_rate")]
    pub annual_rate_pct: f64,

    #[serde(default = "default_years")]
    pub term_years: u32,

    /// Date of the first payment
    pub start_date: NaiveDate,

    #[serde(default)]
    pub costs: MonthlyCosts,

    #[serde(default)]
    pub maintenance: MaintenanceBudget,

    #[serde(default)]
    pub rent: RentAssumptions,

    #[serde(default)]
    pub pmi: PmiSettings,

    #[serde(default)]
    pub tax: TaxSettings,

    #[serde(default)]
    pub resale: ResaleSettings,

    #[serde(default)]
    pub refinance: RefinanceSettings,

    /// Presentation only; the engine never reads it
    #[serde(default)]
    pub page_size: PageSize,
}

impl ScenarioInputs {
    /// Default scenario starting on `start_date`
    pub fn with_start_date(start_date: NaiveDate) -> Self {
        Self {
            home_price: default_home_price(),
            down_payment_pct: default_down_pct(),
            annual_rate_pct: default_rate(),
            term_years: default_years(),
            start_date,
            costs: MonthlyCosts::default(),
            maintenance: MaintenanceBudget::default(),
            rent: RentAssumptions::default(),
            pmi: PmiSettings::default(),
            tax: TaxSettings::default(),
            resale: ResaleSettings::default(),
            refinance: RefinanceSettings::default(),
            page_size: PageSize::default(),
        }
    }

    pub fn down_payment(&self) -> f64 {
        self.down_payment_pct / 100.0 * self.home_price
    }

    /// Amount financed, never negative
    pub fn principal(&self) -> f64 {
        (self.home_price - self.down_payment()).max(0.0)
    }

    pub fn loan(&self) -> Loan {
        Loan::new(self.principal(), self.annual_rate_pct, self.term_years, self.start_date)
    }

    /// PMI applies when less than 20% is put down
    pub fn pmi_required(&self) -> bool {
        self.down_payment_pct < PMI_DOWN_PAYMENT_THRESHOLD_PCT
    }

    pub fn resale_date(&self) -> NaiveDate {
        self.resale
            .date
            .unwrap_or_else(|| add_months(self.start_date, DEFAULT_RESALE_HORIZON_MONTHS))
    }

    pub fn refinance_start_date(&self) -> NaiveDate {
        self.refinance.start_date.unwrap_or(self.start_date)
    }

    pub fn refinance_years(&self) -> u32 {
        self.refinance.years.unwrap_or(self.term_years)
    }

    /// Rent path and fixed ownership costs for the comparator
    pub fn rent_inputs(&self) -> RentInputs {
        RentInputs {
            rent: self.rent.monthly_rent,
            rent_growth_pct: self.rent.annual_growth_pct,
            maintenance_monthly: self.maintenance.monthly(),
            taxes_monthly: self.costs.property_tax,
            insurance_monthly: self.costs.insurance,
            hoa_monthly: self.costs.hoa,
        }
    }

    /// Boundary validation: finite, non-negative amounts and sane percentages
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("home_price", self.home_price),
            ("annual_rate_pct", self.annual_rate_pct),
            ("costs.property_tax", self.costs.property_tax),
            ("costs.insurance", self.costs.insurance),
            ("costs.hoa", self.costs.hoa),
            ("rent.monthly_rent", self.rent.monthly_rent),
            ("rent.annual_growth_pct", self.rent.annual_growth_pct),
            ("pmi.annual_rate_pct", self.pmi.annual_rate_pct),
            ("resale.price", self.resale.price),
            ("refinance.rate_pct", self.refinance.rate_pct),
            ("refinance.closing_costs", self.refinance.closing_costs),
        ];
        for (field, value) in amounts {
            non_negative(field, value)?;
        }
        for (category, value) in self.maintenance.categories() {
            non_negative(&format!("maintenance.{}", category), value)?;
        }

        for (field, value) in [
            ("down_payment_pct", self.down_payment_pct),
            ("resale.selling_cost_pct", self.resale.selling_cost_pct),
            ("tax.marginal_rate_pct", self.tax.marginal_rate_pct),
        ] {
            non_negative(field, value)?;
            if value > 100.0 {
                return Err(EngineError::invalid_input(field, "must not exceed 100%"));
            }
        }

        term_in_range("term_years", self.term_years)?;
        if self.refinance.enabled {
            term_in_range("refinance.years", self.refinance_years())?;
        }
        Ok(())
    }
}

fn term_in_range(field: &str, years: u32) -> Result<()> {
    if years == 0 || years > MAX_TERM_YEARS {
        return Err(EngineError::invalid_input(
            field,
            format!("must be between 1 and {} years, got {}", MAX_TERM_YEARS, years),
        ));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid_input(field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(EngineError::invalid_input(field, format!("must not be negative, got {}", value)));
    }
    Ok(())
}
