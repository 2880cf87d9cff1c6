//! Flat table rows and the resolved, indexed snapshot built from them.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ScheduleStore, StoreError};
use crate::schedule::{
    DrivingEvent, EventType, Rotation, RotationId, Route, RouteId, Scenario, ScenarioId, Station,
    StationId, Trip, TripId, TripType,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRow {
    pub id: RouteId,
    pub name: String,
    pub departure_station_id: StationId,
    pub arrival_station_id: StationId,
    /// Driving distance (m).
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationRow {
    pub id: RotationId,
    pub scenario_id: ScenarioId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRow {
    pub id: TripId,
    pub rotation_id: RotationId,
    pub route_id: RouteId,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub trip_type: TripType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: u64,
    pub trip_id: TripId,
    pub event_type: EventType,
    pub soc_start: f64,
    pub soc_end: f64,
}

/// The raw tables, exactly as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub scenarios: Vec<Scenario>,
    pub stations: Vec<Station>,
    pub routes: Vec<RouteRow>,
    pub rotations: Vec<RotationRow>,
    pub trips: Vec<TripRow>,
    pub events: Vec<EventRow>,
}

/// A resolved read scope. Every foreign key has been checked.
#[derive(Debug, Clone)]
pub struct Snapshot {
    scenarios: BTreeMap<ScenarioId, Scenario>,
    rotations: BTreeMap<ScenarioId, Vec<Rotation>>,
    driving_events: HashMap<TripId, Vec<DrivingEvent>>,
}

fn dangling(table: &'static str, id: u64, references: String) -> StoreError {
    StoreError::DanglingReference {
        table,
        id,
        references,
    }
}

impl Snapshot {
    /// Resolves all references of `dataset` into rotations with nested trips.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DanglingReference`] for the first row that
    /// points at a missing parent.
    pub fn index(dataset: Dataset) -> Result<Self, StoreError> {
        let stations: HashMap<StationId, Station> =
            dataset.stations.into_iter().map(|s| (s.id, s)).collect();

        let mut routes: HashMap<RouteId, Route> = HashMap::with_capacity(dataset.routes.len());
        for r in dataset.routes {
            let departure_station = stations
                .get(&r.departure_station_id)
                .cloned()
                .ok_or_else(|| dangling("routes", r.id, format!("station {}", r.departure_station_id)))?;
            let arrival_station = stations
                .get(&r.arrival_station_id)
                .cloned()
                .ok_or_else(|| dangling("routes", r.id, format!("station {}", r.arrival_station_id)))?;
            routes.insert(
                r.id,
                Route {
                    id: r.id,
                    name: r.name,
                    departure_station,
                    arrival_station,
                    distance: r.distance,
                },
            );
        }

        let scenarios: BTreeMap<ScenarioId, Scenario> =
            dataset.scenarios.into_iter().map(|s| (s.id, s)).collect();

        let mut rotations: BTreeMap<RotationId, Rotation> = BTreeMap::new();
        for r in dataset.rotations {
            if !scenarios.contains_key(&r.scenario_id) {
                return Err(dangling("rotations", r.id, format!("scenario {}", r.scenario_id)));
            }
            rotations.insert(
                r.id,
                Rotation {
                    id: r.id,
                    scenario_id: r.scenario_id,
                    name: r.name,
                    trips: Vec::new(),
                },
            );
        }

        for t in dataset.trips {
            let route = routes
                .get(&t.route_id)
                .cloned()
                .ok_or_else(|| dangling("trips", t.id, format!("route {}", t.route_id)))?;
            let rotation = rotations
                .get_mut(&t.rotation_id)
                .ok_or_else(|| dangling("trips", t.id, format!("rotation {}", t.rotation_id)))?;
            rotation.trips.push(Trip {
                id: t.id,
                rotation_id: t.rotation_id,
                route,
                departure_time: t.departure_time,
                arrival_time: t.arrival_time,
                trip_type: t.trip_type,
            });
        }

        let trip_ids: HashSet<TripId> = rotations
            .values()
            .flat_map(|r| r.trips.iter().map(|t| t.id))
            .collect();

        let mut driving_events: HashMap<TripId, Vec<DrivingEvent>> = HashMap::new();
        for e in dataset.events {
            if !trip_ids.contains(&e.trip_id) {
                return Err(dangling("events", e.id, format!("trip {}", e.trip_id)));
            }
            if e.event_type != EventType::Driving {
                continue;
            }
            driving_events.entry(e.trip_id).or_default().push(DrivingEvent {
                id: e.id,
                trip_id: e.trip_id,
                soc_start: e.soc_start,
                soc_end: e.soc_end,
            });
        }

        let mut by_scenario: BTreeMap<ScenarioId, Vec<Rotation>> = BTreeMap::new();
        for (_, mut rotation) in rotations {
            rotation.trips.sort_by(|a, b| {
                a.departure_time
                    .cmp(&b.departure_time)
                    .then_with(|| a.id.cmp(&b.id))
            });
            by_scenario
                .entry(rotation.scenario_id)
                .or_default()
                .push(rotation);
        }

        Ok(Self {
            scenarios,
            rotations: by_scenario,
            driving_events,
        })
    }
}

impl ScheduleStore for Snapshot {
    fn scenarios(&self) -> Result<Vec<Scenario>, StoreError> {
        Ok(self.scenarios.values().cloned().collect())
    }

    fn rotations(&self, scenario_id: ScenarioId) -> Result<Vec<Rotation>, StoreError> {
        if !self.scenarios.contains_key(&scenario_id) {
            return Err(StoreError::UnknownScenario(scenario_id));
        }
        Ok(self.rotations.get(&scenario_id).cloned().unwrap_or_default())
    }

    fn driving_events(&self, trip_id: TripId) -> Result<Vec<DrivingEvent>, StoreError> {
        Ok(self
            .driving_events
            .get(&trip_id)
            .cloned()
            .unwrap_or_default())
    }
}
