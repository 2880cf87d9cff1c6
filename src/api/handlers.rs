//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{DepotRecord, ErrorResponse, ReportResponse, RotationsQuery};
use crate::analysis::RotationSummary;

/// `GET /report` → 200 + `ReportResponse` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ReportResponse> {
    Json(ReportResponse {
        scenario_id: state.scenario_id,
        report: state.report.clone(),
        share_below_zero: state.report.share_below_zero(),
    })
}

/// Returns rotation summaries, optionally filtered.
///
/// `GET /rotations` → 200 + `Vec<RotationSummary>` JSON
/// `GET /rotations?depot=NAME&infeasible_only=true` → filtered
/// `GET /rotations?depot=` → 400 + `ErrorResponse`
pub async fn get_rotations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RotationsQuery>,
) -> impl IntoResponse {
    if query.depot.as_deref().is_some_and(str::is_empty) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "`depot` must not be empty".to_string(),
            }),
        ));
    }

    let rows: Vec<RotationSummary> = state
        .summaries
        .iter()
        .filter(|s| {
            query
                .depot
                .as_deref()
                .is_none_or(|d| s.originating_depot_name == d)
        })
        .filter(|s| !query.infeasible_only || s.soc_below_zero)
        .cloned()
        .collect();

    Ok(Json(rows))
}

/// `GET /depots` → 200 + `Vec<DepotRecord>` JSON, ordered by depot name
pub async fn get_depots(State(state): State<Arc<AppState>>) -> Json<Vec<DepotRecord>> {
    Json(
        state
            .depots
            .iter()
            .map(|(depot, rotations)| DepotRecord {
                depot: depot.to_string(),
                rotations,
            })
            .collect(),
    )
}
