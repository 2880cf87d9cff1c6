//! Rotation feasibility analysis and derived reports.

pub mod analyzer;
pub mod candidates;
/// Rotations per depot and before/after comparison.
pub mod depot;
pub mod report;

pub use analyzer::{
    AnalysisError, Analyzer, RotationSummary, ScenarioInfo, SortOrder, analyze_rotations,
    sort_summaries, summarize_rotation,
};
pub use candidates::{RemedyCandidates, SplitPlan, StationBreakTime};
pub use depot::{DepotComparison, DepotRotationCounts};
pub use report::{FeasibilityReport, SummaryTable, summarize};
