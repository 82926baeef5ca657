//! The structured index store: `satellite_index`, `processing_summary`,
//! `signal_quality_statistics`, `handover_events_summary`,
//! `satellite_metadata`. Behind the `IndexStore` trait so the gatekeeper
//! (C12) can enforce an allowlist of concrete implementations and so tests
//! can swap in an in-memory fake without a live PostgreSQL instance.

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Config as PoolConfig, Pool, Runtime};
use leo_core::config::PostgresConfig;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio_postgres::NoTls;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteIndexRow {
    pub satellite_id: String,
    pub constellation: String,
    pub norad_id: Option<i64>,
    pub total_points: i64,
    pub visible_points: i64,
    pub visibility_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummaryRow {
    pub id: String,
    pub constellation: String,
    pub stage: String,
    pub total_sats: i64,
    pub retention_rate: f64,
    pub processing_time_s: f64,
    pub size_mb: f64,
}

/// Batch size per flush, per `spec.md` §5.
pub const FLUSH_BATCH_SIZE: usize = 100;

#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn init(&self) -> Result<()>;
    async fn insert_satellite_rows(&self, rows: &[SatelliteIndexRow]) -> Result<()>;
    async fn insert_processing_summary(&self, row: &ProcessingSummaryRow) -> Result<()>;
    async fn commit(&self) -> Result<()>;
    /// Round-trip integrity check: `record_count` in the index for
    /// `satellite_id`, or `None` if the row doesn't exist.
    async fn record_count(&self, satellite_id: &str) -> Result<Option<i64>>;
    fn is_connected(&self) -> bool;
}

/// Live PostgreSQL-backed index store, connection-pooled via deadpool.
pub struct PostgresIndexStore {
    pool: Pool,
    pending: Mutex<Vec<SatelliteIndexRow>>,
}

impl PostgresIndexStore {
    pub async fn connect(cfg: &PostgresConfig) -> Result<Self> {
        let mut pool_cfg = PoolConfig::new();
        pool_cfg.host = Some(cfg.host.clone());
        pool_cfg.port = Some(cfg.port);
        pool_cfg.dbname = Some(cfg.dbname.clone());
        pool_cfg.user = Some(cfg.user.clone());
        pool_cfg.password = Some(cfg.password.clone());

        let pool = pool_cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| Error::Pool(e.to_string()))?;

        // Fail fast if the server is genuinely unreachable — the caller is
        // expected to fall back to bulk-only mode on this error.
        let client = pool
            .get()
            .await
            .map_err(|e| Error::IndexConnection(e.to_string()))?;
        client.simple_query("SELECT 1").await?;

        Ok(Self {
            pool,
            pending: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl IndexStore for PostgresIndexStore {
    async fn init(&self) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| Error::IndexConnection(e.to_string()))?;
        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS satellite_index (
                    satellite_id TEXT PRIMARY KEY,
                    constellation TEXT NOT NULL,
                    norad_id BIGINT,
                    total_points BIGINT NOT NULL,
                    visible_points BIGINT NOT NULL,
                    visibility_ratio DOUBLE PRECISION NOT NULL
                );
                CREATE TABLE IF NOT EXISTS processing_summary (
                    id TEXT PRIMARY KEY,
                    constellation TEXT NOT NULL,
                    stage TEXT NOT NULL,
                    total_sats BIGINT NOT NULL,
                    retention_rate DOUBLE PRECISION NOT NULL,
                    processing_time_s DOUBLE PRECISION NOT NULL,
                    size_mb DOUBLE PRECISION NOT NULL
                );",
            )
            .await?;
        Ok(())
    }

    async fn insert_satellite_rows(&self, rows: &[SatelliteIndexRow]) -> Result<()> {
        let mut pending = self.pending.lock().unwrap();
        pending.extend_from_slice(rows);
        if pending.len() >= FLUSH_BATCH_SIZE {
            let batch = std::mem::take(&mut *pending);
            drop(pending);
            self.flush_rows(&batch).await?;
        }
        Ok(())
    }

    async fn insert_processing_summary(&self, row: &ProcessingSummaryRow) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| Error::IndexConnection(e.to_string()))?;
        client
            .execute(
                "INSERT INTO processing_summary
                    (id, constellation, stage, total_sats, retention_rate, processing_time_s, size_mb)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (id) DO UPDATE SET
                    total_sats = EXCLUDED.total_sats,
                    retention_rate = EXCLUDED.retention_rate,
                    processing_time_s = EXCLUDED.processing_time_s,
                    size_mb = EXCLUDED.size_mb",
                &[
                    &row.id,
                    &row.constellation,
                    &row.stage,
                    &row.total_sats,
                    &row.retention_rate,
                    &row.processing_time_s,
                    &row.size_mb,
                ],
            )
            .await?;
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let remaining = {
            let mut pending = self.pending.lock().unwrap();
            std::mem::take(&mut *pending)
        };
        if !remaining.is_empty() {
            self.flush_rows(&remaining).await?;
        }
        Ok(())
    }

    async fn record_count(&self, satellite_id: &str) -> Result<Option<i64>> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| Error::IndexConnection(e.to_string()))?;
        let row = client
            .query_opt(
                "SELECT total_points FROM satellite_index WHERE satellite_id = $1",
                &[&satellite_id],
            )
            .await?;
        Ok(row.map(|r| r.get::<_, i64>(0)))
    }

    fn is_connected(&self) -> bool {
        self.pool.status().available > 0 || self.pool.status().size > 0
    }
}

impl PostgresIndexStore {
    async fn flush_rows(&self, rows: &[SatelliteIndexRow]) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| Error::IndexConnection(e.to_string()))?;
        for row in rows {
            client
                .execute(
                    "INSERT INTO satellite_index
                        (satellite_id, constellation, norad_id, total_points, visible_points, visibility_ratio)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     ON CONFLICT (satellite_id) DO UPDATE SET
                        total_points = EXCLUDED.total_points,
                        visible_points = EXCLUDED.visible_points,
                        visibility_ratio = EXCLUDED.visibility_ratio",
                    &[
                        &row.satellite_id,
                        &row.constellation,
                        &row.norad_id,
                        &row.total_points,
                        &row.visible_points,
                        &row.visibility_ratio,
                    ],
                )
                .await?;
        }
        Ok(())
    }
}

/// Degraded mode used when the index store is unreachable. Records nothing
/// but lets the pipeline continue — `storage_balance.status` is set to
/// `volume_only` by the caller (`spec.md` §4.1 failure semantics).
#[derive(Default)]
pub struct NullIndexStore;

#[async_trait]
impl IndexStore for NullIndexStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }
    async fn insert_satellite_rows(&self, _rows: &[SatelliteIndexRow]) -> Result<()> {
        Ok(())
    }
    async fn insert_processing_summary(&self, _row: &ProcessingSummaryRow) -> Result<()> {
        Ok(())
    }
    async fn commit(&self) -> Result<()> {
        Ok(())
    }
    async fn record_count(&self, _satellite_id: &str) -> Result<Option<i64>> {
        Ok(None)
    }
    fn is_connected(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBalanceStatus {
    Hybrid,
    VolumeOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageBalanceReport {
    pub status: StorageBalanceStatus,
    pub index_bytes: u64,
    pub bulk_bytes: u64,
    pub index_fraction: f64,
    pub generated_at: DateTime<Utc>,
}
