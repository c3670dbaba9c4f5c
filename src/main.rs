//! Dispatch simulator entry point: CLI wiring and scenario-driven runs.

use std::path::Path;
use std::process;
use std::time::Instant;

use bess_sim::config::ScenarioConfig;
use bess_sim::io::export::export_traces;
use bess_sim::report::RevenueReport;
use bess_sim::sim::DispatchSimulator;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    trace_out: Option<String>,
}

fn print_help() {
    eprintln!("bess-sim — grid-battery curtailment dispatch simulator");
    eprintln!();
    eprintln!("Usage: bess-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>    Load scenario from TOML config file");
    eprintln!("  --preset <name>      Use a built-in preset (baseline, deep_storage, peaker)");
    eprintln!("  --seed <u64>         Override the synthetic generator seed");
    eprintln!("  --trace-out <path>   Export revenue/SOC traces to CSV");
    eprintln!("  --help               Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        trace_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--trace-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --trace-out requires a path argument");
                    process::exit(1);
                }
                cli.trace_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline.
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.synthetic.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let dataset = match scenario.build_dataset() {
        Ok(ds) => ds,
        Err(e) => {
            eprintln!("error: failed to build dataset: {e}");
            process::exit(1);
        }
    };
    if dataset.is_empty() {
        eprintln!("error: input dataset is empty (no joined hours)");
        process::exit(1);
    }

    let sim = DispatchSimulator::new(
        scenario.site.name.as_str(),
        scenario.battery.capacity_mwh,
        scenario.dispatch.discharge_price,
        &dataset,
    );
    let mut sim = match sim {
        Ok(sim) => sim.with_unit_discharge(scenario.dispatch.unit_discharge_mwh),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    eprintln!(
        "Running {} hours for site \"{}\"...",
        dataset.len(),
        sim.site()
    );
    let started = Instant::now();
    if let Err(e) = sim.run() {
        eprintln!("error: simulation failed: {e}");
        process::exit(1);
    }
    eprintln!("Simulation ran in {:.2} seconds", started.elapsed().as_secs_f64());

    let report = RevenueReport::from_trace(sim.revenue_trace());
    println!(
        "Site: {} ({} MWh battery, discharge at >= ${}/MWh)",
        sim.site(),
        sim.battery().capacity_mwh(),
        scenario.dispatch.discharge_price
    );
    println!("{report}");
    println!(
        "Final stored energy: {:.2} MWh",
        sim.battery().stored_mwh()
    );

    if let Some(ref path) = cli.trace_out {
        if let Err(e) = export_traces(sim.revenue_trace(), sim.soc_trace(), Path::new(path)) {
            eprintln!("error: failed to write trace CSV: {e}");
            process::exit(1);
        }
        eprintln!("Traces written to {path}");
    }
}
