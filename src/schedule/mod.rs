//! Read-only schedule and simulation entities.
//!
//! Everything here is owned by the external import and simulation steps.
//! The analyzer only ever reads these values.

pub mod types;

pub use types::{
    DrivingEvent, EventType, Rotation, RotationId, Route, RouteId, Scenario, ScenarioId, Station,
    StationId, Trip, TripId, TripType,
};
