//! Rotations per originating depot and before/after comparison.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::analyzer::{AnalysisError, RotationSummary};
use crate::schedule::Rotation;

/// Number of rotations starting at each depot, keyed by depot name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepotRotationCounts(BTreeMap<String, usize>);

impl DepotRotationCounts {
    pub fn from_summaries(summaries: &[RotationSummary]) -> Self {
        let mut counts = BTreeMap::new();
        for s in summaries {
            *counts.entry(s.originating_depot_name.clone()).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Counts straight from the schedule. No driving events are needed.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MalformedSchedule`] for a rotation without trips.
    pub fn from_rotations(rotations: &[Rotation]) -> Result<Self, AnalysisError> {
        let mut counts = BTreeMap::new();
        for rotation in rotations {
            let depot = rotation
                .originating_depot()
                .ok_or(AnalysisError::MalformedSchedule {
                    rotation_id: rotation.id,
                })?;
            *counts.entry(depot.name.clone()).or_insert(0) += 1;
        }
        Ok(Self(counts))
    }

    /// Count for a depot, zero if it has no rotations.
    pub fn get(&self, depot: &str) -> usize {
        self.0.get(depot).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One depot's rotation count before and after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepotDelta {
    pub depot: String,
    pub before: usize,
    pub after: usize,
}

impl DepotDelta {
    /// Signed change, `after - before`.
    pub fn delta(&self) -> i64 {
        self.after as i64 - self.before as i64
    }
}

/// Aligned comparison of two depot counts, e.g. before and after depot
/// reassignment. Depots missing on one side count as zero there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepotComparison {
    pub rows: Vec<DepotDelta>,
}

impl DepotComparison {
    pub fn new(before: &DepotRotationCounts, after: &DepotRotationCounts) -> Self {
        let mut depots: Vec<&str> = before.iter().map(|(d, _)| d).collect();
        depots.extend(after.iter().map(|(d, _)| d));
        depots.sort_unstable();
        depots.dedup();

        let rows = depots
            .into_iter()
            .map(|depot| DepotDelta {
                depot: depot.to_string(),
                before: before.get(depot),
                after: after.get(depot),
            })
            .collect();
        Self { rows }
    }
}

impl fmt::Display for DepotComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.depot.chars().count())
            .max()
            .unwrap_or(0)
            .max("depot".len());
        writeln!(f, "{:<width$}  {:>6}  {:>6}  {:>6}", "depot", "before", "after", "delta")?;
        for r in &self.rows {
            writeln!(
                f,
                "{:<width$}  {:>6}  {:>6}  {:>+6}",
                r.depot,
                r.before,
                r.after,
                r.delta()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(depot: &str, id: u64) -> RotationSummary {
        RotationSummary {
            rotation_id: id,
            rotation_name: String::new(),
            originating_depot_name: depot.to_string(),
            total_distance: 0.0,
            minimum_soc: 0.5,
            soc_below_zero: false,
        }
    }

    #[test]
    fn counts_rotations_per_depot() {
        let counts =
            DepotRotationCounts::from_summaries(&[at("Britz", 1), at("Britz", 2), at("Spandau", 3)]);
        assert_eq!(counts.get("Britz"), 2);
        assert_eq!(counts.get("Spandau"), 1);
        assert_eq!(counts.get("Mariendorf"), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn comparison_fills_missing_depots_with_zero() {
        let before = DepotRotationCounts::from_summaries(&[at("Mariendorf", 1), at("Britz", 2)]);
        let after =
            DepotRotationCounts::from_summaries(&[at("Britz", 1), at("Köpenicker Landstraße", 2)]);
        let cmp = DepotComparison::new(&before, &after);

        let by_name = |name: &str| cmp.rows.iter().find(|r| r.depot == name).cloned();
        assert_eq!(cmp.rows.len(), 3);
        assert_eq!(
            by_name("Mariendorf").map(|r| (r.before, r.after)),
            Some((1, 0))
        );
        assert_eq!(
            by_name("Köpenicker Landstraße").map(|r| (r.before, r.after, r.delta())),
            Some((0, 1, 1))
        );
        assert_eq!(by_name("Britz").map(|r| r.delta()), Some(0));
    }

    #[test]
    fn counts_from_rotations_use_earliest_departure() {
        use chrono::{Duration, TimeZone, Utc};

        use crate::schedule::{Route, Station, Trip, TripType};

        let t0 = Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap();
        let trip = |id: u64, from: &str, start_min: i64| Trip {
            id,
            rotation_id: 1,
            route: Route {
                id,
                name: String::new(),
                departure_station: Station {
                    id,
                    name: from.to_string(),
                },
                arrival_station: Station {
                    id: 99,
                    name: "Loop".to_string(),
                },
                distance: 1000.0,
            },
            departure_time: t0 + Duration::minutes(start_min),
            arrival_time: t0 + Duration::minutes(start_min + 20),
            trip_type: TripType::Passenger,
        };
        // stored out of order: the later trip comes first
        let rotation = Rotation {
            id: 1,
            scenario_id: 1,
            name: String::new(),
            trips: vec![trip(2, "Loop", 60), trip(1, "Britz", 0)],
        };
        let counts = DepotRotationCounts::from_rotations(&[rotation]).unwrap();
        assert_eq!(counts.get("Britz"), 1);
        assert_eq!(counts.get("Loop"), 0);

        let empty = Rotation {
            id: 8,
            scenario_id: 1,
            name: String::new(),
            trips: Vec::new(),
        };
        assert!(matches!(
            DepotRotationCounts::from_rotations(&[empty]),
            Err(AnalysisError::MalformedSchedule { rotation_id: 8 })
        ));
    }

    #[test]
    fn comparison_of_empty_counts_is_empty() {
        let cmp = DepotComparison::new(&DepotRotationCounts::default(), &DepotRotationCounts::default());
        assert!(cmp.rows.is_empty());
    }
}
