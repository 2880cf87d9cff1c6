//! Remedy candidates for infeasible rotations.
//!
//! Two remedies exist for a rotation that runs out of charge: electrify a
//! terminal where it waits long enough to recharge, or split it into two
//! shorter duties. Nothing here changes the scenario; it only points at
//! where such a change would be made.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::analyzer::{AnalysisError, Analyzer, RotationSummary, analyze_rotations};
use crate::schedule::{Rotation, RotationId, ScenarioId, StationId, TripId};
use crate::store::{ScheduleStore, StoreFactory};

/// Total break time infeasible rotations spend at one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationBreakTime {
    pub station_id: StationId,
    pub station_name: String,
    pub total_break_seconds: i64,
}

/// Ranks arrival stations by the break time infeasible rotations spend there.
///
/// For each infeasible rotation, the gap between consecutive trips is
/// credited to the arrival station of the earlier trip. The final arrival
/// of a rotation is its depot and is never credited. Sorted by break time
/// descending, then station id.
pub fn rank_charging_stations(
    rotations: &[Rotation],
    summaries: &[RotationSummary],
) -> Vec<StationBreakTime> {
    let infeasible: HashSet<RotationId> = summaries
        .iter()
        .filter(|s| s.soc_below_zero)
        .map(|s| s.rotation_id)
        .collect();

    let mut totals: BTreeMap<StationId, StationBreakTime> = BTreeMap::new();
    for rotation in rotations.iter().filter(|r| infeasible.contains(&r.id)) {
        let trips = rotation.trips_in_order();
        for pair in trips.windows(2) {
            let (arriving, next) = (pair[0], pair[1]);
            let station = &arriving.route.arrival_station;
            let seconds = (next.departure_time - arriving.arrival_time).num_seconds();
            totals
                .entry(station.id)
                .or_insert_with(|| StationBreakTime {
                    station_id: station.id,
                    station_name: station.name.clone(),
                    total_break_seconds: 0,
                })
                .total_break_seconds += seconds;
        }
    }

    let mut ranking: Vec<StationBreakTime> = totals.into_values().collect();
    ranking.sort_by(|a, b| {
        b.total_break_seconds
            .cmp(&a.total_break_seconds)
            .then_with(|| a.station_id.cmp(&b.station_id))
    });
    ranking
}

/// Top of the ranking, if any station has a positive break time.
pub fn best_charging_station(ranking: &[StationBreakTime]) -> Option<&StationBreakTime> {
    ranking.first().filter(|s| s.total_break_seconds > 0)
}

/// The infeasible rotation with the lowest minimum SoC. Ties go to the
/// lowest rotation id.
pub fn split_candidate(summaries: &[RotationSummary]) -> Option<&RotationSummary> {
    summaries
        .iter()
        .filter(|s| s.soc_below_zero)
        .min_by(|a, b| {
            a.minimum_soc
                .total_cmp(&b.minimum_soc)
                .then_with(|| a.rotation_id.cmp(&b.rotation_id))
        })
}

/// Index of the first trip whose cumulative distance exceeds half of the
/// rotation's total distance.
///
/// `None` if the rotation has fewer than two trips or the first half would
/// be empty.
pub fn split_point(rotation: &Rotation) -> Option<usize> {
    let trips = rotation.trips_in_order();
    if trips.len() < 2 {
        return None;
    }
    let half = rotation.total_distance() / 2.0;
    let mut cumulative = 0.0;
    let index = trips.iter().position(|t| {
        cumulative += t.route.distance;
        cumulative > half
    })?;
    (index > 0).then_some(index)
}

/// Trip ids of both halves of a split rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    pub rotation_id: RotationId,
    pub first: Vec<TripId>,
    pub second: Vec<TripId>,
}

impl SplitPlan {
    pub fn for_rotation(rotation: &Rotation) -> Option<Self> {
        let index = split_point(rotation)?;
        let ids: Vec<TripId> = rotation.trips_in_order().iter().map(|t| t.id).collect();
        let (first, second) = ids.split_at(index);
        Some(Self {
            rotation_id: rotation.id,
            first: first.to_vec(),
            second: second.to_vec(),
        })
    }
}

/// Both remedy candidates for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemedyCandidates {
    pub scenario_id: ScenarioId,
    pub infeasible_rotations: usize,
    pub charging_stations: Vec<StationBreakTime>,
    pub split: Option<SplitPlan>,
}

/// Computes remedy candidates against one read scope.
pub fn remedy_candidates(
    store: &impl ScheduleStore,
    scenario_id: ScenarioId,
) -> Result<RemedyCandidates, AnalysisError> {
    let rotations = store.rotations(scenario_id)?;
    let summaries = analyze_rotations(store, scenario_id)?;

    let charging_stations = rank_charging_stations(&rotations, &summaries);
    let split = split_candidate(&summaries).and_then(|worst| {
        rotations
            .iter()
            .find(|r| r.id == worst.rotation_id)
            .and_then(SplitPlan::for_rotation)
    });

    Ok(RemedyCandidates {
        scenario_id,
        infeasible_rotations: summaries.iter().filter(|s| s.soc_below_zero).count(),
        charging_stations,
        split,
    })
}

impl<F: StoreFactory> Analyzer<F> {
    /// Remedy candidates for `scenario_id`, from a fresh read scope.
    pub fn remedies(&self, scenario_id: ScenarioId) -> Result<RemedyCandidates, AnalysisError> {
        let candidates = self.scoped(|store| remedy_candidates(store, scenario_id))?;
        if candidates.infeasible_rotations > 0 && candidates.split.is_none() {
            log::warn!("no rotation of scenario {scenario_id} can be split");
        }
        if candidates.infeasible_rotations > 0
            && best_charging_station(&candidates.charging_stations).is_none()
        {
            log::warn!("no terminal of scenario {scenario_id} qualifies for a charger");
        }
        Ok(candidates)
    }
}
