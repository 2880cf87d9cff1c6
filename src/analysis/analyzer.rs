//! Per-rotation minimum state of charge and feasibility classification.

use serde::{Deserialize, Serialize};

use super::depot::DepotRotationCounts;
use crate::schedule::{Rotation, RotationId, ScenarioId};
use crate::store::{ScheduleStore, StoreError, StoreFactory};

/// Why a rotation could not be summarized.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("rotation {rotation_id} has no trips; the imported schedule is malformed")]
    MalformedSchedule { rotation_id: RotationId },
    #[error(
        "rotation {rotation_id} has no driving events; run the consumption simulation for its scenario first"
    )]
    MissingSimulationData { rotation_id: RotationId },
    #[error(
        "rotation {rotation_id} has a driving event {event_id} with non-finite SoC {soc_end}; the simulation output is corrupt"
    )]
    NonFiniteSoc {
        rotation_id: RotationId,
        event_id: u64,
        soc_end: f64,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Feasibility result for one rotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationSummary {
    pub rotation_id: RotationId,
    pub rotation_name: String,
    /// Departure station of the earliest-departing trip.
    pub originating_depot_name: String,
    /// Sum of trip route distances (m).
    pub total_distance: f64,
    /// Lowest end-of-segment SoC over all driving events.
    pub minimum_soc: f64,
    /// `minimum_soc < 0.0`.
    pub soc_below_zero: bool,
}

/// Display order for summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// By originating depot name, then rotation id.
    Depot,
    /// By rotation id.
    #[default]
    Rotation,
    /// As produced.
    None,
}

/// Sorts summaries in place for reproducible display.
pub fn sort_summaries(summaries: &mut [RotationSummary], order: SortOrder) {
    match order {
        SortOrder::Depot => summaries.sort_by(|a, b| {
            a.originating_depot_name
                .cmp(&b.originating_depot_name)
                .then_with(|| a.rotation_id.cmp(&b.rotation_id))
        }),
        SortOrder::Rotation => summaries.sort_by_key(|s| s.rotation_id),
        SortOrder::None => {}
    }
}

/// Summarizes a single rotation against the driving events in `store`.
///
/// # Errors
///
/// * [`AnalysisError::MalformedSchedule`] if the rotation has no trips
/// * [`AnalysisError::MissingSimulationData`] if none of its trips has a
///   driving event
/// * [`AnalysisError::NonFiniteSoc`] if any driving event ends on NaN or
///   an infinite SoC
pub fn summarize_rotation(
    store: &impl ScheduleStore,
    rotation: &Rotation,
) -> Result<RotationSummary, AnalysisError> {
    let depot = rotation
        .originating_depot()
        .ok_or(AnalysisError::MalformedSchedule {
            rotation_id: rotation.id,
        })?;

    let mut minimum_soc: Option<f64> = None;
    for trip in rotation.trips_in_order() {
        for event in store.driving_events(trip.id)? {
            if !event.soc_end.is_finite() {
                return Err(AnalysisError::NonFiniteSoc {
                    rotation_id: rotation.id,
                    event_id: event.id,
                    soc_end: event.soc_end,
                });
            }
            minimum_soc = Some(minimum_soc.map_or(event.soc_end, |m| m.min(event.soc_end)));
        }
    }
    let minimum_soc = minimum_soc.ok_or(AnalysisError::MissingSimulationData {
        rotation_id: rotation.id,
    })?;

    Ok(RotationSummary {
        rotation_id: rotation.id,
        rotation_name: rotation.name.clone(),
        originating_depot_name: depot.name.clone(),
        total_distance: rotation.total_distance(),
        minimum_soc,
        soc_below_zero: minimum_soc < 0.0,
    })
}

/// Summarizes every rotation of a scenario, in rotation-id order.
///
/// Fails fast: the first rotation that cannot be summarized aborts the run.
pub fn analyze_rotations(
    store: &impl ScheduleStore,
    scenario_id: ScenarioId,
) -> Result<Vec<RotationSummary>, AnalysisError> {
    let mut rotations = store.rotations(scenario_id)?;
    rotations.sort_by_key(|r| r.id);

    let mut summaries = Vec::with_capacity(rotations.len());
    for rotation in &rotations {
        let summary = summarize_rotation(store, rotation)?;
        log::debug!(
            "rotation {} ({}) from {}: {:.1} km, min SoC {:.4}",
            summary.rotation_id,
            summary.rotation_name,
            summary.originating_depot_name,
            summary.total_distance / 1000.0,
            summary.minimum_soc
        );
        summaries.push(summary);
    }
    Ok(summaries)
}

/// One row of the scenario listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioInfo {
    pub id: ScenarioId,
    pub name: String,
    pub rotation_count: usize,
}

/// Entry point bound to an explicit data source.
///
/// Every call opens a fresh read scope from the factory and releases it
/// before returning.
#[derive(Debug, Clone)]
pub struct Analyzer<F: StoreFactory> {
    factory: F,
}

impl<F: StoreFactory> Analyzer<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Runs `f` against a newly opened read scope.
    pub fn scoped<T, E>(&self, f: impl FnOnce(&F::Store) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let store = self.factory.open()?;
        f(&store)
    }

    /// Summarizes every rotation of `scenario_id`.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed or unsimulated rotation, or if the
    /// store cannot be read.
    pub fn analyze(&self, scenario_id: ScenarioId) -> Result<Vec<RotationSummary>, AnalysisError> {
        let summaries = self.scoped(|store| analyze_rotations(store, scenario_id))?;
        log::info!(
            "analyzed {} rotations of scenario {scenario_id}",
            summaries.len()
        );
        Ok(summaries)
    }

    /// Rotations per originating depot of `scenario_id`.
    ///
    /// Reads the schedule only, so it works on scenarios that have not
    /// been simulated yet.
    pub fn depot_counts(
        &self,
        scenario_id: ScenarioId,
    ) -> Result<DepotRotationCounts, AnalysisError> {
        self.scoped(|store| DepotRotationCounts::from_rotations(&store.rotations(scenario_id)?))
    }

    /// Lists scenarios with their rotation counts.
    pub fn list_scenarios(&self) -> Result<Vec<ScenarioInfo>, StoreError> {
        self.scoped(|store| {
            store
                .scenarios()?
                .into_iter()
                .map(|s| -> Result<ScenarioInfo, StoreError> {
                    let rotation_count = store.rotations(s.id)?.len();
                    Ok(ScenarioInfo {
                        id: s.id,
                        name: s.name,
                        rotation_count,
                    })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: RotationId, depot: &str, soc: f64) -> RotationSummary {
        RotationSummary {
            rotation_id: id,
            rotation_name: format!("{id}"),
            originating_depot_name: depot.to_string(),
            total_distance: 0.0,
            minimum_soc: soc,
            soc_below_zero: soc < 0.0,
        }
    }

    #[test]
    fn depot_order_breaks_ties_by_id() {
        let mut s = vec![
            summary(4, "Spandau", 0.1),
            summary(2, "Britz", 0.1),
            summary(1, "Spandau", 0.1),
        ];
        sort_summaries(&mut s, SortOrder::Depot);
        let ids: Vec<RotationId> = s.iter().map(|s| s.rotation_id).collect();
        assert_eq!(ids, vec![2, 1, 4]);
    }

    #[test]
    fn none_order_keeps_input() {
        let mut s = vec![summary(3, "B", 0.1), summary(1, "A", 0.1)];
        sort_summaries(&mut s, SortOrder::None);
        assert_eq!(s[0].rotation_id, 3);
    }

    #[test]
    fn error_messages_name_the_rotation() {
        let e = AnalysisError::MissingSimulationData { rotation_id: 42 };
        assert!(e.to_string().contains("rotation 42"));
        let e = AnalysisError::MalformedSchedule { rotation_id: 7 };
        assert!(e.to_string().contains("rotation 7"));
        let e = AnalysisError::NonFiniteSoc {
            rotation_id: 3,
            event_id: 12,
            soc_end: f64::NAN,
        };
        assert!(e.to_string().contains("rotation 3"));
        assert!(e.to_string().contains("event 12"));
    }
}
