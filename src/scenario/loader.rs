//! Load scenarios from a JSON file or a flat CSV batch file

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use log::debug;

use super::inputs::{MaintenanceBudget, ScenarioInputs};
use crate::error::Result;

/// A batch scenario with the label from its CSV row
#[derive(Debug, Clone)]
pub struct NamedScenario {
    pub name: String,
    pub inputs: ScenarioInputs,
}

/// Raw CSV row for batch files; blank or missing columns take the defaults
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "StartDate")]
    start_date: NaiveDate,
    #[serde(rename = "HomePrice", default)]
    home_price: Option<f64>,
    #[serde(rename = "DownPaymentPct", default)]
    down_payment_pct: Option<f64>,
    #[serde(rename = "RatePct", default)]
    rate_pct: Option<f64>,
    #[serde(rename = "TermYears", default)]
    term_years: Option<u32>,
    #[serde(rename = "PropertyTax", default)]
    property_tax: Option<f64>,
    #[serde(rename = "Insurance", default)]
    insurance: Option<f64>,
    #[serde(rename = "Hoa", default)]
    hoa: Option<f64>,
    /// Whole annual maintenance budget in one figure
    #[serde(rename = "MaintenanceAnnual", default)]
    maintenance_annual: Option<f64>,
    #[serde(rename = "Rent", default)]
    rent: Option<f64>,
    #[serde(rename = "RentGrowthPct", default)]
    rent_growth_pct: Option<f64>,
    #[serde(rename = "PmiRatePct", default)]
    pmi_rate_pct: Option<f64>,
    #[serde(rename = "PmiExempt", default)]
    pmi_exempt: Option<bool>,
    #[serde(rename = "TaxDeduction", default)]
    tax_deduction: Option<bool>,
    #[serde(rename = "MarginalRatePct", default)]
    marginal_rate_pct: Option<f64>,
    #[serde(rename = "ResaleEnabled", default)]
    resale_enabled: Option<bool>,
    #[serde(rename = "ResalePrice", default)]
    resale_price: Option<f64>,
    #[serde(rename = "ResaleDate", default)]
    resale_date: Option<NaiveDate>,
    #[serde(rename = "SellingCostPct", default)]
    selling_cost_pct: Option<f64>,
    #[serde(rename = "RefiEnabled", default)]
    refi_enabled: Option<bool>,
    #[serde(rename = "RefiRatePct", default)]
    refi_rate_pct: Option<f64>,
    #[serde(rename = "RefiYears", default)]
    refi_years: Option<u32>,
    #[serde(rename = "RefiStartDate", default)]
    refi_start_date: Option<NaiveDate>,
    #[serde(rename = "RefiClosingCosts", default)]
    refi_closing_costs: Option<f64>,
}

impl CsvRow {
    fn to_scenario(self) -> Result<NamedScenario> {
        let mut inputs = ScenarioInputs::with_start_date(self.start_date);

        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut inputs.home_price, self.home_price);
        set(&mut inputs.down_payment_pct, self.down_payment_pct);
        set(&mut inputs.annual_rate_pct, self.rate_pct);
        set(&mut inputs.term_years, self.term_years);

        set(&mut inputs.costs.property_tax, self.property_tax);
        set(&mut inputs.costs.insurance, self.insurance);
        set(&mut inputs.costs.hoa, self.hoa);
        if let Some(annual) = self.maintenance_annual {
            inputs.maintenance = MaintenanceBudget::lump_sum(annual);
        }

        set(&mut inputs.rent.monthly_rent, self.rent);
        set(&mut inputs.rent.annual_growth_pct, self.rent_growth_pct);
        set(&mut inputs.pmi.annual_rate_pct, self.pmi_rate_pct);
        set(&mut inputs.pmi.exempt, self.pmi_exempt);
        set(&mut inputs.tax.deduction_enabled, self.tax_deduction);
        set(&mut inputs.tax.marginal_rate_pct, self.marginal_rate_pct);

        set(&mut inputs.resale.enabled, self.resale_enabled);
        set(&mut inputs.resale.price, self.resale_price);
        inputs.resale.date = self.resale_date;
        set(&mut inputs.resale.selling_cost_pct, self.selling_cost_pct);

        set(&mut inputs.refinance.enabled, self.refi_enabled);
        set(&mut inputs.refinance.rate_pct, self.refi_rate_pct);
        inputs.refinance.years = self.refi_years;
        inputs.refinance.start_date = self.refi_start_date;
        set(&mut inputs.refinance.closing_costs, self.refi_closing_costs);

        inputs.validate()?;
        Ok(NamedScenario {
            name: self.name,
            inputs,
        })
    }
}

/// Load a single scenario from a JSON file
pub fn load_scenario_json<P: AsRef<Path>>(path: P) -> Result<ScenarioInputs> {
    let file = File::open(path.as_ref())?;
    load_scenario_json_from_reader(BufReader::new(file))
}

/// Load a single scenario from any JSON reader
pub fn load_scenario_json_from_reader<R: Read>(reader: R) -> Result<ScenarioInputs> {
    let inputs: ScenarioInputs = serde_json::from_reader(reader)?;
    inputs.validate()?;
    Ok(inputs)
}

/// Load all scenarios from a CSV batch file
pub fn load_scenarios_csv<P: AsRef<Path>>(path: P) -> Result<Vec<NamedScenario>> {
    let reader = Reader::from_path(path.as_ref())?;
    collect_rows(reader)
}

/// Load scenarios from any reader (e.g., string buffer, network stream)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<NamedScenario>> {
    collect_rows(Reader::from_reader(reader))
}

fn collect_rows<R: Read>(mut reader: Reader<R>) -> Result<Vec<NamedScenario>> {
    let mut scenarios = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.to_scenario()?);
    }
    debug!("Loaded {} scenarios", scenarios.len());
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    const BATCH: &str = "\
Name,StartDate,HomePrice,DownPaymentPct,RatePct,TermYears,MaintenanceAnnual,ResaleEnabled,ResaleDate,RefiYears
base,2024-01-01,,,,,,,,
starter,2025-06-01,250000,5,7.0,30,1800,false,,
short,2024-01-01,400000,25,5.75,15,,true,2030-01-01,10
";

    #[test]
    fn test_load_batch_with_defaults() {
        let scenarios = load_scenarios_from_reader(BATCH.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 3);

        let base = &scenarios[0];
        assert_eq!(base.name, "base");
        assert_eq!(base.inputs, ScenarioInputs::with_start_date(base.inputs.start_date));

        let starter = &scenarios[1].inputs;
        assert_eq!(starter.home_price, 250_000.0);
        assert_eq!(starter.down_payment_pct, 5.0);
        assert!(starter.pmi_required());
        assert_eq!(starter.maintenance.annual_total(), 1800.0);
        assert!(!starter.resale.enabled);

        let short = &scenarios[2].inputs;
        assert_eq!(short.term_years, 15);
        assert_eq!(short.resale_date(), NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert_eq!(short.refinance_years(), 10);
    }

    #[test]
    fn test_missing_optional_columns() {
        let csv = "Name,StartDate\nonly,2024-03-01\n";
        let scenarios = load_scenarios_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(scenarios[0].inputs.home_price, 300_000.0);
        assert_eq!(scenarios[0].inputs.refinance_years(), 30);
    }

    #[test]
    fn test_invalid_row_rejected() {
        let csv = "Name,StartDate,DownPaymentPct\nbad,2024-01-01,150\n";
        let err = load_scenarios_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_oversized_term_rejected() {
        let csv = "Name,StartDate,TermYears\nhuge,2024-01-01,400000000\n";
        let err = load_scenarios_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));

        let json = r#"{ "start_date": "2024-01-01", "term_years": 400000000 }"#;
        assert!(load_scenario_json_from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn test_malformed_date_is_csv_error() {
        let csv = "Name,StartDate\nbad,01/02/2024\n";
        let err = load_scenarios_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::Csv(_)));
    }

    #[test]
    fn test_json_reader() {
        let json = r#"{ "start_date": "2024-01-01", "term_years": 20 }"#;
        let inputs = load_scenario_json_from_reader(json.as_bytes()).unwrap();
        assert_eq!(inputs.term_years, 20);

        let bad = r#"{ "start_date": "2024-01-01", "term_years": 0 }"#;
        assert!(load_scenario_json_from_reader(bad.as_bytes()).is_err());
    }
}
