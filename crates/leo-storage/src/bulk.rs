//! File-per-constellation bulk store: full position time-series, signal
//! timeline, per-satellite summaries.

use crate::error::Result;
use async_trait::async_trait;
use leo_core::model::{Constellation, PositionSample};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Serialize)]
pub struct SatelliteBulkRecord<'a> {
    pub satellite_id: &'a str,
    pub constellation: Constellation,
    pub position_timeseries: &'a [PositionSample],
}

#[async_trait]
pub trait BulkWriter: Send + Sync {
    async fn write_timeseries(
        &self,
        constellation: Constellation,
        records: &[SatelliteBulkRecord<'_>],
    ) -> Result<PathBuf>;

    async fn write_events(&self, name: &str, events_json: &serde_json::Value) -> Result<PathBuf>;
}

pub struct JsonBulkWriter {
    root: PathBuf,
}

impl JsonBulkWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Purge previous-run subdirectories under `root` before emission.
    /// Never touches the parent data root itself (`spec.md` §4.1 cleanup
    /// contract).
    pub async fn purge_previous_run(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).await?;
            return Ok(());
        }
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_dir() {
                fs::remove_dir_all(&path).await?;
            } else {
                fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }

    fn constellation_path(&self, constellation: Constellation) -> PathBuf {
        self.root.join(format!("{}_timeseries.json", constellation.as_str()))
    }
}

#[async_trait]
impl BulkWriter for JsonBulkWriter {
    async fn write_timeseries(
        &self,
        constellation: Constellation,
        records: &[SatelliteBulkRecord<'_>],
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).await?;
        let path = self.constellation_path(constellation);
        let payload = serde_json::to_vec_pretty(records)?;
        let mut file = fs::File::create(&path).await?;
        file.write_all(&payload).await?;
        file.flush().await?;
        Ok(path)
    }

    async fn write_events(&self, name: &str, events_json: &serde_json::Value) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).await?;
        let path = self.root.join(format!("{name}.json"));
        let payload = serde_json::to_vec_pretty(events_json)?;
        let mut file = fs::File::create(&path).await?;
        file.write_all(&payload).await?;
        file.flush().await?;
        Ok(path)
    }
}

/// Total size in bytes of every file directly under `dir`.
pub async fn directory_size_bytes(dir: &Path) -> std::io::Result<u64> {
    if !dir.exists() {
        return Ok(0);
    }
    let mut total = 0u64;
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if let Ok(meta) = entry.metadata().await {
            if meta.is_file() {
                total += meta.len();
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn purge_removes_prior_contents_not_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("bulk");
        fs::create_dir_all(&root).await.unwrap();
        fs::write(root.join("stale.json"), b"{}").await.unwrap();

        let writer = JsonBulkWriter::new(&root);
        writer.purge_previous_run().await.unwrap();

        assert!(root.exists());
        assert!(!root.join("stale.json").exists());
        assert!(tmp.path().exists());
    }

    #[tokio::test]
    async fn writes_and_reads_back_timeseries() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = JsonBulkWriter::new(tmp.path());
        let records: Vec<SatelliteBulkRecord> = vec![];
        let path = writer
            .write_timeseries(Constellation::Starlink, &records)
            .await
            .unwrap();
        assert!(path.exists());
        let contents = fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert!(parsed.is_array());
    }
}
