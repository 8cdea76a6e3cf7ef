//! services/companion/src/lib.rs
//!
//! Local persistence and session wiring for the MindCare companion: storage
//! adapters, the record store, the entity repositories and the app state.

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod records;
pub mod repositories;
pub mod store;
pub mod telemetry;
