//! Run every scenario in a CSV batch file
//!
//! Outputs one summary line per scenario

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use mortgage_projection::scenario::{load_scenarios_csv, NamedScenario};
use mortgage_projection::{ScenarioResult, ScenarioRunner, ScheduleCache};

#[derive(Parser, Debug)]
#[command(name = "run_batch")]
#[command(about = "Project a batch of mortgage scenarios and write a summary CSV")]
struct Args {
    /// Scenario CSV (Name,StartDate,HomePrice,... columns)
    input: PathBuf,

    /// Summary CSV to write
    #[arg(short, long, default_value = "batch_summary.csv")]
    output: PathBuf,

    /// Run sequentially, reusing schedules for repeated loan terms
    #[arg(long)]
    memoize: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let scenarios = load_scenarios_csv(&args.input)
        .with_context(|| format!("Failed to load scenarios from {}", args.input.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new();
    let run_start = Instant::now();

    let results: Vec<_> = if args.memoize {
        let mut cache = ScheduleCache::new();
        let results: Vec<_> = scenarios
            .iter()
            .map(|s| runner.run_cached(&mut cache, &s.inputs))
            .collect();
        info!(
            "Schedule cache: {} built, {} reused ({:.0}% hit rate)",
            cache.misses,
            cache.hits,
            cache.hit_rate() * 100.0
        );
        results
    } else {
        let inputs: Vec<_> = scenarios.iter().map(|s| s.inputs.clone()).collect();
        runner.run_batch(&inputs)
    };
    println!("Projections complete in {:?}", run_start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([
        "Name",
        "Principal",
        "MonthlyPI",
        "FirstMonthTotal",
        "TotalInterest",
        "SaleMonth",
        "Equity",
        "RentTotal",
        "BuyTotal",
        "RefiDifference",
        "RefiConclusion",
        "Error",
    ])?;

    let mut failures = 0;
    for (scenario, result) in scenarios.iter().zip(&results) {
        let record = match result {
            Ok(result) => summary_record(scenario, result),
            Err(err) => {
                failures += 1;
                warn!("Scenario {} failed: {}", scenario.name, err);
                let mut record = vec![String::new(); 12];
                record[0] = scenario.name.clone();
                record[11] = err.to_string();
                record
            }
        };
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!(
        "\nBatch Summary: {} succeeded, {} failed",
        results.len() - failures,
        failures
    );
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}

fn summary_record(scenario: &NamedScenario, result: &ScenarioResult) -> Vec<String> {
    let money = |value: f64| format!("{:.2}", value);
    let (rent_total, buy_total) = result.rent_vs_buy.final_totals().unwrap_or((0.0, 0.0));
    let (sale_month, equity) = match &result.resale {
        Some(resale) => ((resale.sale_index + 1).to_string(), money(resale.equity)),
        None => (String::new(), String::new()),
    };
    let (refi_difference, refi_conclusion) = match &result.refinance {
        Some(refi) => (money(refi.difference), refi.conclusion.to_string()),
        None => (String::new(), String::new()),
    };

    vec![
        scenario.name.clone(),
        money(result.principal),
        money(result.metrics.monthly_pi),
        money(result.metrics.first_month_total),
        money(result.metrics.total_interest),
        sale_month,
        equity,
        money(rent_total),
        money(buy_total),
        refi_difference,
        refi_conclusion,
        String::new(),
    ]
}
