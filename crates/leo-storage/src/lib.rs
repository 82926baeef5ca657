//! Hybrid storage integrator (C4): structured index store for metadata and
//! statistics, bulk object store for time-series. Behind `IndexStore` and
//! `BulkWriter` traits so both are swappable per the DI design note.

pub mod bulk;
pub mod error;
pub mod index;
pub mod integrator;

pub use bulk::{BulkWriter, JsonBulkWriter, SatelliteBulkRecord};
pub use error::{Error, Result};
pub use index::{IndexStore, NullIndexStore, PostgresIndexStore, StorageBalanceReport, StorageBalanceStatus};
pub use integrator::{integrate, verify_round_trip, IntegrationOutcome};
