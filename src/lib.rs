//! Battery feasibility analysis of electric bus rotations.
//!
//! Reads an imported schedule and the `DRIVING` events a consumption
//! simulation wrote for it, and reports per rotation whether the state of
//! charge drops below zero.

pub mod analysis;
#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod io;
pub mod runner;
/// Schedule entities: scenarios, stations, routes, trips, rotations.
pub mod schedule;
pub mod store;
pub mod synthetic;
