//! Config resolution and command execution behind the binary.
//!
//! Everything here returns values; printing is left to `main`.

use std::path::Path;

use crate::analysis::{
    AnalysisError, Analyzer, DepotComparison, FeasibilityReport,
    RemedyCandidates, RotationSummary, ScenarioInfo, sort_summaries,
};
use crate::cli::{Cli, Command};
use crate::config::{AnalysisConfig, ConfigError};
use crate::io::export_csv;
use crate::schedule::ScenarioId;
use crate::store::{DirectoryStore, StoreError};
use crate::synthetic;

/// Anything that makes a command fail.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("{}", join_config_errors(.0))]
    Config(Vec<ConfigError>),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to write `{}`: {source}", path.display())]
    Export {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("API server failed: {0}")]
    Serve(std::io::Error),
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(vec![e])
    }
}

/// Loads the config file (if any), applies command-line overrides and
/// validates the result.
///
/// # Arguments
///
/// * `cli` - Parsed command line
///
/// # Returns
///
/// The effective configuration, or every validation error at once.
pub fn resolve_config(cli: &Cli) -> Result<AnalysisConfig, RunError> {
    let mut cfg = match &cli.config {
        Some(path) => AnalysisConfig::from_toml_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(dir) = &cli.data_dir {
        cfg.data.dir = dir.clone();
    }
    match &cli.command {
        Command::Analyze {
            scenario_id,
            sort,
            csv_out,
            ..
        } => {
            if let Some(id) = scenario_id {
                cfg.analysis.scenario_id = *id;
            }
            if let Some(sort) = sort {
                cfg.analysis.sort = *sort;
            }
            if csv_out.is_some() {
                cfg.report.csv_out = csv_out.clone();
            }
        }
        Command::Candidates {
            scenario_id: Some(id),
        } => cfg.analysis.scenario_id = *id,
        Command::Generate {
            rotations: Some(n),
            ..
        } => cfg.synthetic.rotations = *n,
        _ => {}
    }

    let errors = cfg.validate();
    if errors.is_empty() {
        Ok(cfg)
    } else {
        Err(RunError::Config(errors))
    }
}

fn analyzer(cfg: &AnalysisConfig) -> Analyzer<DirectoryStore> {
    Analyzer::new(DirectoryStore::new(&cfg.data.dir))
}

/// Result of the `analyze` command.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub scenario_id: ScenarioId,
    /// Summaries in the configured order.
    pub summaries: Vec<RotationSummary>,
    pub report: FeasibilityReport,
}

/// Analyzes the configured scenario and writes the CSV export if requested.
pub fn run_analyze(cfg: &AnalysisConfig) -> Result<AnalysisRun, RunError> {
    let scenario_id = cfg.analysis.scenario_id;
    let mut summaries = analyzer(cfg).analyze(scenario_id)?;
    sort_summaries(&mut summaries, cfg.analysis.sort);
    let report = FeasibilityReport::summarize(&summaries);

    if let Some(path) = &cfg.report.csv_out {
        export_csv(&summaries, path).map_err(|source| RunError::Export {
            path: path.clone(),
            source,
        })?;
    }

    Ok(AnalysisRun {
        scenario_id,
        summaries,
        report,
    })
}

pub fn run_scenarios(cfg: &AnalysisConfig) -> Result<Vec<ScenarioInfo>, RunError> {
    Ok(analyzer(cfg).list_scenarios()?)
}

/// Depot rotation counts of `before` against `after`, each read from its
/// own scope. Only the schedule is read, so `after` may be a freshly
/// optimized scenario that has not been simulated.
pub fn run_compare(
    cfg: &AnalysisConfig,
    before: ScenarioId,
    after: ScenarioId,
) -> Result<DepotComparison, RunError> {
    let analyzer = analyzer(cfg);
    let before = analyzer.depot_counts(before)?;
    let after = analyzer.depot_counts(after)?;
    Ok(DepotComparison::new(&before, &after))
}

pub fn run_candidates(cfg: &AnalysisConfig) -> Result<RemedyCandidates, RunError> {
    Ok(analyzer(cfg).remedies(cfg.analysis.scenario_id)?)
}

/// What `generate` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub rotations: usize,
    pub trips: usize,
    pub events: usize,
}

/// Writes a seeded demo dataset to `out`.
pub fn run_generate(
    cfg: &AnalysisConfig,
    out: &Path,
    seed: u64,
) -> Result<GenerateSummary, RunError> {
    let dataset = synthetic::generate(&cfg.synthetic, seed);
    DirectoryStore::new(out).write(&dataset)?;
    log::info!("wrote demo dataset to {}", out.display());
    Ok(GenerateSummary {
        rotations: dataset.rotations.len(),
        trips: dataset.trips.len(),
        events: dataset.events.len(),
    })
}
