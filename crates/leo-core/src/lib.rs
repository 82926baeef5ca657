//! Shared data model, error taxonomy, environment configuration, and run
//! context for the LEO constellation dynamic pool planner (Stage 5 & 6
//! core). See `SPEC_FULL.md` for the full component map.

pub mod config;
pub mod context;
pub mod detseed;
pub mod error;
pub mod ids;
pub mod model;

pub use config::RunConfig;
pub use context::RunContext;
pub use error::{Error, Result};
pub use ids::{SampleIndex, SatelliteBitset, SatelliteId};
pub use model::*;
