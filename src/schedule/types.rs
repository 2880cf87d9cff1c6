//! Scenario, station, route, rotation, trip, and event types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ScenarioId = u64;
pub type StationId = u64;
pub type RouteId = u64;
pub type RotationId = u64;
pub type TripId = u64;

/// A self-contained planning scenario (one imported schedule variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
}

/// A stop, terminal, or depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

/// A route between two stations with a fixed driving distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub departure_station: Station,
    pub arrival_station: Station,
    /// Driving distance (m).
    pub distance: f64,
}

/// Whether a trip carries passengers or is a deadhead movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripType {
    Passenger,
    Empty,
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripType::Passenger => write!(f, "PASSENGER"),
            TripType::Empty => write!(f, "EMPTY"),
        }
    }
}

/// One continuous driving segment of a rotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub id: TripId,
    pub rotation_id: RotationId,
    pub route: Route,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub trip_type: TripType,
}

/// The duty of one vehicle: an ordered sequence of trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotation {
    pub id: RotationId,
    pub scenario_id: ScenarioId,
    pub name: String,
    pub trips: Vec<Trip>,
}

impl Rotation {
    /// Trips ordered by departure time, ties broken by trip id.
    ///
    /// Independent of the order in which the store returned them.
    pub fn trips_in_order(&self) -> Vec<&Trip> {
        let mut trips: Vec<&Trip> = self.trips.iter().collect();
        trips.sort_by(|a, b| {
            a.departure_time
                .cmp(&b.departure_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        trips
    }

    /// The earliest-departing trip, if any.
    pub fn first_trip(&self) -> Option<&Trip> {
        self.trips_in_order().into_iter().next()
    }

    /// Departure station of the earliest-departing trip.
    pub fn originating_depot(&self) -> Option<&Station> {
        self.first_trip().map(|t| &t.route.departure_station)
    }

    /// Sum of route distances (m), accumulated in trip order.
    pub fn total_distance(&self) -> f64 {
        self.trips_in_order()
            .iter()
            .map(|t| t.route.distance)
            .sum()
    }
}

/// Kind of a simulated vehicle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Driving,
    ChargingDepot,
    ChargingOpportunity,
    Standby,
}

/// State-of-charge bounds of one simulated driving segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrivingEvent {
    pub id: u64,
    pub trip_id: TripId,
    /// SoC at the start of the segment (1.0 = full).
    pub soc_start: f64,
    /// SoC at the end of the segment; negative means the battery ran dry.
    pub soc_end: f64,
}
