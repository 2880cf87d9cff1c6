//! REST API over a finished feasibility analysis.
//!
//! Provides three GET endpoints:
//! - `/report`: scenario id and aggregate feasibility counts
//! - `/rotations`: per-rotation summaries, filterable by depot and outcome
//! - `/depots`: rotation counts per originating depot

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::analysis::{DepotRotationCounts, FeasibilityReport, RotationSummary};
use crate::schedule::ScenarioId;

/// Immutable application state shared across all request handlers.
///
/// Built once after `analyze` returns. Read-only, so no locks.
pub struct AppState {
    /// Scenario the summaries belong to.
    pub scenario_id: ScenarioId,
    /// Aggregate counts over `summaries`.
    pub report: FeasibilityReport,
    /// Rotation summaries in display order.
    pub summaries: Vec<RotationSummary>,
    /// Rotations per originating depot.
    pub depots: DepotRotationCounts,
}

impl AppState {
    /// Derives the report and depot counts from `summaries`.
    pub fn new(scenario_id: ScenarioId, summaries: Vec<RotationSummary>) -> Self {
        Self {
            scenario_id,
            report: FeasibilityReport::summarize(&summaries),
            depots: DepotRotationCounts::from_summaries(&summaries),
            summaries,
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared, read-only analysis result
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(handlers::get_report))
        .route("/rotations", get(handlers::get_rotations))
        .route("/depots", get(handlers::get_depots))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process ends.
///
/// # Arguments
///
/// * `state` - Shared, read-only analysis result
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
