//! Seeded demo datasets.
//!
//! Produces a scenario that looks like what the import and simulation steps
//! leave behind: depots, terminals, shuttle rotations with deadhead trips
//! at both ends, and one `DRIVING` event per trip. Used for demos and tests
//! when no real export is at hand.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::schedule::{EventType, Scenario, Station, StationId, TripType};
use crate::store::{Dataset, EventRow, RotationRow, RouteRow, TripRow};

/// Id offset for terminal stations, keeps them apart from depot ids.
const TERMINAL_ID_OFFSET: StationId = 1000;

/// Generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Number of depots.
    pub depots: usize,
    /// Number of terminal stations (must be >= 2).
    pub terminals: usize,
    /// Number of rotations in the scenario.
    pub rotations: usize,
    /// Minimum passenger trips per rotation.
    pub min_passenger_trips: usize,
    /// Maximum passenger trips per rotation.
    pub max_passenger_trips: usize,
    /// Shortest route (km).
    pub min_route_km: f64,
    /// Longest route (km).
    pub max_route_km: f64,
    /// Lowest per-rotation consumption (SoC per km).
    pub min_soc_per_km: f64,
    /// Highest per-rotation consumption (SoC per km).
    pub max_soc_per_km: f64,
    /// Average speed used to derive trip durations (km/h).
    pub average_speed_kmh: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            depots: 3,
            terminals: 8,
            rotations: 24,
            min_passenger_trips: 6,
            max_passenger_trips: 14,
            min_route_km: 6.0,
            max_route_km: 18.0,
            min_soc_per_km: 0.002,
            max_soc_per_km: 0.0045,
            average_speed_kmh: 18.0,
        }
    }
}

/// Builds routes lazily so that each station pair keeps one distance.
struct RouteBook {
    routes: Vec<RouteRow>,
    by_pair: HashMap<(StationId, StationId), usize>,
}

impl RouteBook {
    fn route(
        &mut self,
        rng: &mut StdRng,
        cfg: &SyntheticConfig,
        from: &Station,
        to: &Station,
    ) -> &RouteRow {
        let next_id = self.routes.len() as u64 + 1;
        let idx = *self.by_pair.entry((from.id, to.id)).or_insert_with(|| {
            let km = rng.random_range(cfg.min_route_km..=cfg.max_route_km);
            self.routes.push(RouteRow {
                id: next_id,
                name: format!("{} -> {}", from.name, to.name),
                departure_station_id: from.id,
                arrival_station_id: to.id,
                distance: (km * 1000.0).round(),
            });
            self.routes.len() - 1
        });
        &self.routes[idx]
    }
}

/// Generates a single-scenario dataset. Same `cfg` and `seed`, same dataset.
///
/// `cfg` is expected to be valid (see
/// [`AnalysisConfig::validate`](crate::config::AnalysisConfig::validate)).
pub fn generate(cfg: &SyntheticConfig, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let depots: Vec<Station> = (1..=cfg.depots as u64)
        .map(|i| Station {
            id: i,
            name: format!("Depot {i}"),
        })
        .collect();
    let terminals: Vec<Station> = (1..=cfg.terminals as u64)
        .map(|i| Station {
            id: TERMINAL_ID_OFFSET + i,
            name: format!("Terminal {i}"),
        })
        .collect();

    let mut book = RouteBook {
        routes: Vec::new(),
        by_pair: HashMap::new(),
    };
    let mut rotations = Vec::with_capacity(cfg.rotations);
    let mut trips = Vec::new();
    let mut events = Vec::new();

    let day_start: DateTime<Utc> = Utc
        .with_ymd_and_hms(2024, 3, 4, 4, 30, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH);

    for r in 0..cfg.rotations {
        let rotation_id = r as u64 + 1;
        let depot = &depots[r % depots.len()];
        let a = rng.random_range(0..terminals.len());
        let b = (a + rng.random_range(1..terminals.len())) % terminals.len();
        let (ta, tb) = (&terminals[a], &terminals[b]);
        let passenger_trips =
            rng.random_range(cfg.min_passenger_trips..=cfg.max_passenger_trips);
        let soc_per_km = rng.random_range(cfg.min_soc_per_km..=cfg.max_soc_per_km);

        rotations.push(RotationRow {
            id: rotation_id,
            scenario_id: 1,
            name: format!("{}/{}", r % 200 + 100, r / 200 + 1),
        });

        // depot -> A, A <-> B shuttles, last terminal -> depot
        let mut legs: Vec<(&Station, &Station, TripType)> = vec![(depot, ta, TripType::Empty)];
        for k in 0..passenger_trips {
            let (from, to) = if k % 2 == 0 { (ta, tb) } else { (tb, ta) };
            legs.push((from, to, TripType::Passenger));
        }
        let last = legs.last().map_or(ta, |l| l.1);
        legs.push((last, depot, TripType::Empty));

        let mut clock = day_start + Duration::minutes(rng.random_range(0..180));
        let mut soc = 1.0_f64;
        for (from, to, trip_type) in legs {
            let route = book.route(&mut rng, cfg, from, to);
            let km = route.distance / 1000.0;
            let route_id = route.id;
            let minutes = (km / cfg.average_speed_kmh * 60.0).ceil() as i64;

            let trip_id = trips.len() as u64 + 1;
            let departure_time = clock;
            let arrival_time = departure_time + Duration::minutes(minutes.max(1));
            trips.push(TripRow {
                id: trip_id,
                rotation_id,
                route_id,
                departure_time,
                arrival_time,
                trip_type,
            });

            let soc_end = soc - km * soc_per_km;
            events.push(EventRow {
                id: events.len() as u64 + 1,
                trip_id,
                event_type: EventType::Driving,
                soc_start: soc,
                soc_end,
            });
            soc = soc_end;

            let layover = match trip_type {
                TripType::Passenger => rng.random_range(4..=15),
                TripType::Empty => 5,
            };
            clock = arrival_time + Duration::minutes(layover);
        }
    }

    let mut stations = depots;
    stations.extend(terminals);

    log::debug!(
        "generated {} rotations, {} trips, {} routes from seed {seed}",
        rotations.len(),
        trips.len(),
        book.routes.len()
    );

    Dataset {
        scenarios: vec![Scenario {
            id: 1,
            name: format!("Synthetic (seed {seed})"),
        }],
        stations,
        routes: book.routes,
        rotations,
        trips,
        events,
    }
}
