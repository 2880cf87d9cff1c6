//! CSV-table dataset directory.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Dataset, Snapshot, StoreError, StoreFactory};

pub const SCENARIOS_FILE: &str = "scenarios.csv";
pub const STATIONS_FILE: &str = "stations.csv";
pub const ROUTES_FILE: &str = "routes.csv";
pub const ROTATIONS_FILE: &str = "rotations.csv";
pub const TRIPS_FILE: &str = "trips.csv";
pub const EVENTS_FILE: &str = "events.csv";

const SCENARIOS_HEADER: &[&str] = &["id", "name"];
const STATIONS_HEADER: &[&str] = &["id", "name"];
const ROUTES_HEADER: &[&str] = &[
    "id",
    "name",
    "departure_station_id",
    "arrival_station_id",
    "distance",
];
const ROTATIONS_HEADER: &[&str] = &["id", "scenario_id", "name"];
const TRIPS_HEADER: &[&str] = &[
    "id",
    "rotation_id",
    "route_id",
    "departure_time",
    "arrival_time",
    "trip_type",
];
const EVENTS_HEADER: &[&str] = &["id", "trip_id", "event_type", "soc_start", "soc_end"];

/// A dataset stored as one CSV file per table.
///
/// Every [`StoreFactory::open`] re-reads the files, so a simulation run that
/// rewrote `events.csv` is visible to the next analysis without any cache
/// to invalidate.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads all tables. `events.csv` may be absent (simulation not run yet).
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if a required file is missing or a row fails
    /// to parse.
    pub fn load(&self) -> Result<Dataset, StoreError> {
        let events_path = self.dir.join(EVENTS_FILE);
        let events = if events_path.exists() {
            read_table(&events_path)?
        } else {
            log::debug!("{} not present, treating as empty", events_path.display());
            Vec::new()
        };

        Ok(Dataset {
            scenarios: read_table(&self.dir.join(SCENARIOS_FILE))?,
            stations: read_table(&self.dir.join(STATIONS_FILE))?,
            routes: read_table(&self.dir.join(ROUTES_FILE))?,
            rotations: read_table(&self.dir.join(ROTATIONS_FILE))?,
            trips: read_table(&self.dir.join(TRIPS_FILE))?,
            events,
        })
    }

    /// Writes every table, creating the directory if needed. Each file
    /// starts with its header row, also when the table is empty.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the directory or any file cannot be written.
    pub fn write(&self, dataset: &Dataset) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        write_table(&self.dir.join(SCENARIOS_FILE), SCENARIOS_HEADER, &dataset.scenarios)?;
        write_table(&self.dir.join(STATIONS_FILE), STATIONS_HEADER, &dataset.stations)?;
        write_table(&self.dir.join(ROUTES_FILE), ROUTES_HEADER, &dataset.routes)?;
        write_table(&self.dir.join(ROTATIONS_FILE), ROTATIONS_HEADER, &dataset.rotations)?;
        write_table(&self.dir.join(TRIPS_FILE), TRIPS_HEADER, &dataset.trips)?;
        write_table(&self.dir.join(EVENTS_FILE), EVENTS_HEADER, &dataset.events)?;
        Ok(())
    }
}

impl StoreFactory for DirectoryStore {
    type Store = Snapshot;

    fn open(&self) -> Result<Snapshot, StoreError> {
        log::debug!("opening dataset at {}", self.dir.display());
        Snapshot::index(self.load()?)
    }
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    rdr.deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Header is written explicitly; serde only emits one along with a first row.
fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), StoreError> {
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    wtr.write_record(header).map_err(csv_err)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
