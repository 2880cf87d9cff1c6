//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analysis::SortOrder;
use crate::schedule::ScenarioId;

/// Battery feasibility of electric bus rotations from simulated SoC.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML configuration file. Flags override its values.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding the schedule and simulation CSV tables.
    #[arg(long, global = true, env = "EBUS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Log per-rotation details.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Summarizes every rotation of a scenario and prints the feasibility report.
    Analyze {
        #[arg(short, long)]
        scenario_id: Option<ScenarioId>,
        /// Row order of the table and CSV export.
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,
        /// Also write the summaries as CSV.
        #[arg(long)]
        csv_out: Option<PathBuf>,
        /// Serve the result over HTTP after printing it.
        #[cfg(feature = "api")]
        #[arg(long)]
        serve: bool,
        #[cfg(feature = "api")]
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Lists scenarios with their rotation counts.
    Scenarios,
    /// Compares rotations per depot between two scenarios.
    Compare {
        #[arg(long)]
        before: ScenarioId,
        #[arg(long)]
        after: ScenarioId,
    },
    /// Suggests a terminal to electrify and a rotation to split.
    Candidates {
        #[arg(short, long)]
        scenario_id: Option<ScenarioId>,
    },
    /// Writes a seeded demo dataset.
    Generate {
        /// Output directory, created if missing.
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Overrides `synthetic.rotations`.
        #[arg(long)]
        rotations: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_overrides() {
        let cli = Cli::try_parse_from([
            "ebus-feasibility",
            "--data-dir",
            "export",
            "analyze",
            "--scenario-id",
            "7",
            "--sort",
            "depot",
            "--csv-out",
            "out.csv",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("export")));
        match cli.command {
            Command::Analyze {
                scenario_id,
                sort,
                csv_out,
                ..
            } => {
                assert_eq!(scenario_id, Some(7));
                assert_eq!(sort, Some(SortOrder::Depot));
                assert_eq!(csv_out, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ebus-feasibility", "scenarios", "-v", "--config", "a.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn compare_requires_both_scenarios() {
        assert!(Cli::try_parse_from(["ebus-feasibility", "compare", "--before", "1"]).is_err());
    }

    #[test]
    fn generate_defaults_seed() {
        let cli = Cli::try_parse_from(["ebus-feasibility", "generate", "--out", "demo"]).unwrap();
        match cli.command {
            Command::Generate {
                seed, rotations, ..
            } => {
                assert_eq!(seed, 42);
                assert_eq!(rotations, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_sort_rejected() {
        assert!(
            Cli::try_parse_from(["ebus-feasibility", "analyze", "--sort", "distance"]).is_err()
        );
    }
}
