//! Read access to externally-owned schedule and simulation data.
//!
//! A [`StoreFactory`] hands out read scopes. Each scope is a consistent
//! snapshot taken when it was opened; the analyzer opens a new one for
//! every run so that writes committed by the simulation in the meantime
//! are never masked by stale entities.

pub mod dataset;
pub mod directory;
pub mod shared;

use std::path::PathBuf;

use crate::schedule::{DrivingEvent, Rotation, Scenario, ScenarioId, TripId};

pub use dataset::{Dataset, EventRow, RotationRow, RouteRow, Snapshot, TripRow};
pub use directory::DirectoryStore;
pub use shared::SharedDataset;

/// Failure while reading or resolving the external data.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse `{}`: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("unknown scenario {0}")]
    UnknownScenario(ScenarioId),
    #[error("{table} row {id} references missing {references}")]
    DanglingReference {
        table: &'static str,
        id: u64,
        references: String,
    },
    #[error("shared dataset lock was poisoned by a panicking writer")]
    Poisoned,
}

/// One read scope over the schedule and simulation tables.
pub trait ScheduleStore {
    /// All scenarios, ordered by id.
    fn scenarios(&self) -> Result<Vec<Scenario>, StoreError>;

    /// Rotations of a scenario with their trips resolved and ordered by
    /// departure time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownScenario`] if the scenario does not exist.
    fn rotations(&self, scenario_id: ScenarioId) -> Result<Vec<Rotation>, StoreError>;

    /// `DRIVING` events recorded for a trip. Empty if the simulation has
    /// not produced any.
    fn driving_events(&self, trip_id: TripId) -> Result<Vec<DrivingEvent>, StoreError>;
}

/// Opens fresh read scopes.
pub trait StoreFactory {
    type Store: ScheduleStore;

    /// Opens a new scope reflecting everything committed so far.
    fn open(&self) -> Result<Self::Store, StoreError>;
}
