//! Scenario configuration, loading and orchestration

mod inputs;
mod loader;
mod runner;

pub use inputs::{
    MaintenanceBudget, MonthlyCosts, PmiSettings, RefinanceSettings, RentAssumptions,
    ResaleSettings, ScenarioInputs, TaxSettings, PMI_DOWN_PAYMENT_THRESHOLD_PCT,
};
pub use loader::{
    load_scenario_json, load_scenario_json_from_reader, load_scenarios_csv,
    load_scenarios_from_reader, NamedScenario,
};
pub use runner::{Metrics, ScenarioResult, ScenarioRunner};
