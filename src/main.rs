//! Episode driver — CLI wiring and random-policy rollout.

use std::path::Path;
use std::process;

use rand::{Rng, SeedableRng, rngs::StdRng};

use bess_env::config::EnvConfig;
use bess_env::env::{AgentAction, TwoAgentPowerEnv};
use bess_env::telemetry::{EpisodeRow, export_csv};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed: u64,
    telemetry_out: Option<String>,
}

fn print_help() {
    eprintln!("bess-env — battery energy-storage cluster environment");
    eprintln!();
    eprintln!("Runs one random-policy episode of the two-agent environment.");
    eprintln!();
    eprintln!("Usage: bess-env [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline)");
    eprintln!("  --seed <u64>             Random seed (default: 42)");
    eprintln!("  --telemetry-out <path>   Export step telemetry to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed: 42,
        telemetry_out: None,
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
                    cli.seed = s;
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --telemetry-out requires a path argument");
                    process::exit(1);
                }
                cli.telemetry_out = Some(args[i].clone());
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

/// Runs one full episode under a uniform random policy.
fn run_episode(env: &mut TwoAgentPowerEnv, rng: &mut StdRng) -> Vec<EpisodeRow> {
    let max_steps = env.config().episode.max_steps;
    let mut rows = Vec::with_capacity(max_steps as usize);

    env.reset(rng);
    for step in 1..=max_steps {
        let main = if rng.random_range(0..2) == 1 {
            AgentAction::Discharge
        } else {
            AgentAction::Charge
        };
        let support = if rng.random_range(0..2) == 1 {
            AgentAction::Discharge
        } else {
            AgentAction::Charge
        };

        match env.step((main, support)) {
            Ok(outcome) => {
                println!("t={step:>3} | {outcome}");
                rows.push(EpisodeRow::from_step(step, &outcome));
                if outcome.done {
                    break;
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }
    rows
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let scenario = if let Some(ref path) = cli.scenario_path {
        match EnvConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match EnvConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        EnvConfig::baseline()
    };

    // Surface every validation error, not just the first
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let mut env = match TwoAgentPowerEnv::new(scenario) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let rows = run_episode(&mut env, &mut rng);

    let total_main: f32 = rows.iter().map(|r| r.reward_main).sum();
    let total_support: f32 = rows.iter().map(|r| r.reward_support).sum();
    println!(
        "\nepisode return: main={total_main:.3} support={total_support:.3} over {} steps",
        rows.len()
    );

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&rows, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }
}
