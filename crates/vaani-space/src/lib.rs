//! # Vaani Space
//!
//! Read-only snapshot data polled by the visualization: the live ISS
//! position (with last-known fallback) and a static satellite catalog.
//! Nothing here pushes or streams.

pub mod catalog;
pub mod config;
pub mod error;
pub mod iss;

pub use catalog::{CatalogSatellite, Orbit, CATALOG};
pub use config::SpaceConfig;
pub use error::SpaceError;
pub use iss::{IssPosition, IssTracker};
