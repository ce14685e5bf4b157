//! # locksim-cli
//!
//! Command-line driver for the locksim deadlock simulator.
//!
//! ## Usage
//!
//! ```bash
//! # Run a built-in scenario under the avoidance (Banker's) policy
//! locksim --scenario tiny --policy avoidance
//!
//! # Let the deadlock scenario actually deadlock
//! locksim --scenario deadlock --policy permissive
//!
//! # Run a scenario from a JSON file with a CSV event log
//! locksim --scenario-file contended.json --log events.csv
//!
//! # Machine-readable output
//! locksim --scenario medium --json --metrics metrics.json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use locksim_engine::{NullSink, Policy, RunOutcome, RunReport, Simulator};
use locksim_scenarios::Scenario;

mod config;
mod error;
mod event_log;
mod output;

use config::Config;
use error::CliError;
use event_log::CsvEventLog;
use output::Output;

/// Deadlock avoidance and detection simulator
#[derive(Parser, Debug)]
#[command(name = "locksim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Arbitration policy
    #[arg(short, long, value_enum)]
    policy: Option<PolicyArg>,

    /// Built-in scenario name (tiny, deadlock, medium)
    #[arg(short, long, conflicts_with = "scenario_file")]
    scenario: Option<String>,

    /// Load the scenario from a JSON file instead
    #[arg(long, value_name = "PATH")]
    scenario_file: Option<PathBuf>,

    /// Write a CSV event log of every arbitration decision
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Write the metrics report as JSON
    #[arg(long, value_name = "PATH")]
    metrics: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Persist the resolved policy and scenario as the config defaults
    #[arg(long)]
    save_defaults: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

/// Arbitration policy, as selected on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Grant only requests that keep the state safe (Banker's algorithm)
    #[value(alias = "banker")]
    Avoidance,
    /// Grant whatever is physically available and detect deadlocks after
    #[value(alias = "ostrich")]
    Permissive,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Avoidance => Policy::Avoidance,
            PolicyArg::Permissive => Policy::Permissive,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(e) = run(cli, &config) {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli, config: &Config) -> Result<(), CliError> {
    let scenario = match &cli.scenario_file {
        Some(path) => Scenario::from_json_file(path)?,
        None => {
            let name = cli.scenario.as_deref().unwrap_or(&config.default_scenario);
            Scenario::by_name(name)?
        }
    };
    let policy = cli
        .policy
        .map(Policy::from)
        .unwrap_or(config.default_policy);

    if cli.save_defaults {
        let mut updated = config.clone();
        updated.default_policy = policy;
        // A file-loaded scenario has no stable name to default to.
        if cli.scenario_file.is_none() {
            updated.default_scenario = scenario.name.clone();
        }
        updated.save()?;
        tracing::info!(
            policy = policy.as_str(),
            scenario = %updated.default_scenario,
            "config defaults saved"
        );
    }

    tracing::info!(
        scenario = %scenario.name,
        policy = policy.as_str(),
        n = scenario.n(),
        m = scenario.m(),
        "starting run"
    );

    let system = scenario.build_system(policy)?;
    let mut sim = Simulator::new(system);

    let report = match &cli.log {
        Some(path) => {
            let mut log = CsvEventLog::create(path, scenario.m())?;
            let report = sim.run(&mut log)?;
            log.finish()?;
            report
        }
        None => sim.run(&mut NullSink)?,
    };

    if let Some(path) = &cli.metrics {
        std::fs::write(path, report.metrics.to_json()?)?;
        tracing::debug!(path = %path.display(), "metrics report written");
    }

    print_report(&scenario.name, &report, cli.json)?;
    Ok(())
}

fn print_report(scenario: &str, report: &RunReport, json: bool) -> Result<(), CliError> {
    let outcome = match report.outcome {
        RunOutcome::Completed => "completed",
        RunOutcome::Stalled { deadlocked: true } => "deadlock",
        RunOutcome::Stalled { deadlocked: false } => "stalled",
    };
    let m = &report.metrics;

    let mut message = format!(
        "scenario={} policy={} n={} m={}\n\
         outcome={} rounds={}\n\
         requests={} grants={} blocks={}",
        scenario,
        m.policy,
        m.n,
        m.m,
        outcome,
        report.rounds,
        m.total_requests,
        m.grants,
        m.blocks
    );
    if let Some(avg) = m.safety_ns_avg() {
        message.push_str(&format!(
            "\nsafety_calls={} avg_safety_ns={}",
            m.safety_calls, avg
        ));
    }
    if m.deadlocks_found > 0 {
        message.push_str(&format!(
            "\ndeadlocks_found={} first_deadlock_tick={}",
            m.deadlocks_found, m.first_deadlock_tick
        ));
    }

    Output::new(json)
        .field("scenario", scenario)
        .field("outcome", outcome)
        .field_u64("rounds", report.rounds)
        .field_value("metrics", serde_json::to_value(&report.metrics)?)
        .field_value("processes", serde_json::to_value(&report.processes)?)
        .message(&message)
        .print();
    Ok(())
}
