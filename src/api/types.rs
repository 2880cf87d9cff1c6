//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::analysis::FeasibilityReport;
use crate::schedule::ScenarioId;

/// `GET /report` body.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub scenario_id: ScenarioId,
    #[serde(flatten)]
    pub report: FeasibilityReport,
    /// `None` when the scenario has no rotations.
    pub share_below_zero: Option<f64>,
}

/// One entry of `GET /depots`.
#[derive(Debug, Serialize)]
pub struct DepotRecord {
    pub depot: String,
    pub rotations: usize,
}

/// Optional filters for the rotations endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RotationsQuery {
    /// Only rotations starting at this depot (exact name match).
    pub depot: Option<String>,
    /// Only rotations whose SoC drops below zero.
    #[serde(default)]
    pub infeasible_only: bool,
}

/// Error response body for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
