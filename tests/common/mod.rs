//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use ebus_feasibility::schedule::{EventType, Scenario, Station, TripType};
use ebus_feasibility::store::{Dataset, EventRow, RotationRow, RouteRow, TripRow};

/// Depot station ids used by [`DatasetBuilder`].
pub const DEPOT_NORTH: u64 = 1;
pub const DEPOT_SOUTH: u64 = 2;
/// Terminal station id used by [`DatasetBuilder`].
pub const TERMINAL: u64 = 10;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 5, 0, 0).unwrap()
}

/// Builds small datasets one rotation at a time.
///
/// Stations are two depots and one terminal. Every rotation drives
/// depot -> terminal -> depot, each leg on its own route.
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    pub fn new() -> Self {
        let station = |id: u64, name: &str| Station {
            id,
            name: name.to_string(),
        };
        Self {
            dataset: Dataset {
                scenarios: vec![Scenario {
                    id: 1,
                    name: "Base".to_string(),
                }],
                stations: vec![
                    station(DEPOT_NORTH, "Depot North"),
                    station(DEPOT_SOUTH, "Depot South"),
                    station(TERMINAL, "Terminal"),
                ],
                ..Dataset::default()
            },
        }
    }

    pub fn scenario(mut self, id: u64, name: &str) -> Self {
        self.dataset.scenarios.push(Scenario {
            id,
            name: name.to_string(),
        });
        self
    }

    fn route(&mut self, from: u64, to: u64, km: f64) -> u64 {
        let id = self.dataset.routes.len() as u64 + 1;
        self.dataset.routes.push(RouteRow {
            id,
            name: format!("{from}-{to}"),
            departure_station_id: from,
            arrival_station_id: to,
            distance: km * 1000.0,
        });
        id
    }

    /// Adds a two-trip rotation whose SoC ends at `min_soc` on the way back.
    /// Each leg is `km` long. `start_min` offsets the first departure.
    pub fn rotation(
        mut self,
        scenario_id: u64,
        rotation_id: u64,
        depot: u64,
        km: f64,
        min_soc: f64,
        start_min: i64,
    ) -> Self {
        self.dataset.rotations.push(RotationRow {
            id: rotation_id,
            scenario_id,
            name: format!("{rotation_id}/1"),
        });
        let mid_soc = (1.0 + min_soc) / 2.0;
        let legs = [(depot, TERMINAL, 1.0, mid_soc), (TERMINAL, depot, mid_soc, min_soc)];
        let mut clock = t0() + Duration::minutes(start_min);
        for (from, to, soc_start, soc_end) in legs {
            let route_id = self.route(from, to, km);
            let trip_id = self.dataset.trips.len() as u64 + 1;
            self.dataset.trips.push(TripRow {
                id: trip_id,
                rotation_id,
                route_id,
                departure_time: clock,
                arrival_time: clock + Duration::minutes(40),
                trip_type: TripType::Passenger,
            });
            self.dataset.events.push(EventRow {
                id: self.dataset.events.len() as u64 + 1,
                trip_id,
                event_type: EventType::Driving,
                soc_start,
                soc_end,
            });
            clock += Duration::minutes(60);
        }
        self
    }

    /// Adds a rotation with one trip per entry of `trips`, alternating
    /// depot -> terminal and back, each 5 km. Every value of an entry
    /// becomes one `DRIVING` event of that trip with that `soc_end`.
    pub fn rotation_with_events(
        mut self,
        scenario_id: u64,
        rotation_id: u64,
        depot: u64,
        trips: &[&[f64]],
    ) -> Self {
        self.dataset.rotations.push(RotationRow {
            id: rotation_id,
            scenario_id,
            name: format!("{rotation_id}/1"),
        });
        let mut clock = t0();
        for (i, soc_ends) in trips.iter().enumerate() {
            let (from, to) = if i % 2 == 0 { (depot, TERMINAL) } else { (TERMINAL, depot) };
            let route_id = self.route(from, to, 5.0);
            let trip_id = self.dataset.trips.len() as u64 + 1;
            self.dataset.trips.push(TripRow {
                id: trip_id,
                rotation_id,
                route_id,
                departure_time: clock,
                arrival_time: clock + Duration::minutes(20),
                trip_type: TripType::Passenger,
            });
            for &soc_end in soc_ends.iter() {
                self.dataset.events.push(EventRow {
                    id: self.dataset.events.len() as u64 + 1,
                    trip_id,
                    event_type: EventType::Driving,
                    soc_start: soc_end,
                    soc_end,
                });
            }
            clock += Duration::minutes(30);
        }
        self
    }

    /// Adds a non-driving event with `soc_end` to the given trip.
    pub fn charging_event(mut self, trip_id: u64, soc_end: f64) -> Self {
        self.dataset.events.push(EventRow {
            id: self.dataset.events.len() as u64 + 1,
            trip_id,
            event_type: EventType::ChargingDepot,
            soc_start: soc_end,
            soc_end,
        });
        self
    }

    pub fn without_events(mut self) -> Self {
        self.dataset.events.clear();
        self
    }

    pub fn build(self) -> Dataset {
        self.dataset
    }
}

/// Minimum SoC values of the four-rotation reference case.
pub const REFERENCE_MIN_SOC: [f64; 4] = [0.53, 0.0058, -0.01, 0.35];

/// Four rotations in scenario 1 with minimum SoC [`REFERENCE_MIN_SOC`].
/// Rotations 1 and 2 start at Depot North, 3 and 4 at Depot South.
pub fn reference_dataset() -> Dataset {
    let mut b = DatasetBuilder::new();
    for (i, soc) in REFERENCE_MIN_SOC.iter().enumerate() {
        let depot = if i < 2 { DEPOT_NORTH } else { DEPOT_SOUTH };
        b = b.rotation(1, i as u64 + 1, depot, 12.0, *soc, i as i64 * 15);
    }
    b.build()
}
