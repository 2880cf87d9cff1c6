//! Rotation feasibility analyzer entry point: CLI wiring and output.

use std::process;

use clap::Parser;

use ebus_feasibility::analysis::SummaryTable;
use ebus_feasibility::analysis::candidates::best_charging_station;
use ebus_feasibility::cli::{Cli, Command};
use ebus_feasibility::runner::{self, RunError};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let cfg = runner::resolve_config(cli)?;

    match &cli.command {
        Command::Analyze {
            #[cfg(feature = "api")]
            serve,
            #[cfg(feature = "api")]
            port,
            ..
        } => {
            let run = runner::run_analyze(&cfg)?;
            if cfg.report.show_table {
                println!("{}", SummaryTable(&run.summaries));
            }
            println!("{}", run.report);
            if let Some(path) = &cfg.report.csv_out {
                eprintln!("Summaries written to {}", path.display());
            }

            #[cfg(feature = "api")]
            if *serve {
                serve_api(run, *port)?;
            }
        }
        Command::Scenarios => {
            println!("{:>6}  {:>9}  name", "id", "rotations");
            for s in runner::run_scenarios(&cfg)? {
                println!("{:>6}  {:>9}  {}", s.id, s.rotation_count, s.name);
            }
        }
        Command::Compare { before, after } => {
            let comparison = runner::run_compare(&cfg, *before, *after)?;
            println!("Rotations per depot, scenario {before} -> {after}");
            print!("{comparison}");
        }
        Command::Candidates { .. } => {
            let c = runner::run_candidates(&cfg)?;
            println!(
                "Scenario {}: {} infeasible rotations",
                c.scenario_id, c.infeasible_rotations
            );
            match best_charging_station(&c.charging_stations) {
                Some(s) => println!(
                    "Electrify: {} (id {}), {:.1} h of breaks",
                    s.station_name,
                    s.station_id,
                    s.total_break_seconds as f64 / 3600.0
                ),
                None => println!("Electrify: no candidate"),
            }
            match &c.split {
                Some(plan) => println!(
                    "Split: rotation {} into trips {:?} and {:?}",
                    plan.rotation_id, plan.first, plan.second
                ),
                None => println!("Split: no candidate"),
            }
        }
        Command::Generate { out, seed, .. } => {
            let written = runner::run_generate(&cfg, out, *seed)?;
            println!(
                "Generated {} rotations, {} trips, {} driving events in {}",
                written.rotations,
                written.trips,
                written.events,
                out.display()
            );
        }
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve_api(run: runner::AnalysisRun, port: u16) -> Result<(), RunError> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(ebus_feasibility::api::AppState::new(
        run.scenario_id,
        run.summaries,
    ));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().map_err(RunError::Serve)?;
    rt.block_on(ebus_feasibility::api::serve(state, addr))
        .map_err(RunError::Serve)
}
