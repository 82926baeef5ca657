//! Upstream loader: Stage 5 treats Stages 1-4 as external producers whose
//! JSON artifacts (one array of `Satellite` per constellation) are read
//! from `input_dir`, named `{constellation}.json`.

use leo_core::model::{Constellation, Satellite};
use leo_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

const CONSTELLATIONS: &[Constellation] = &[Constellation::Starlink, Constellation::OneWeb];

pub async fn load_upstream(input_dir: &Path) -> Result<HashMap<Constellation, Vec<Satellite>>> {
    let mut by_constellation = HashMap::new();
    for constellation in CONSTELLATIONS {
        let path = input_dir.join(format!("{}.json", constellation.as_str()));
        let bytes = fs::read(&path)
            .await
            .map_err(|e| Error::InputUnavailable(format!("{}: {e}", path.display())))?;
        let satellites: Vec<Satellite> = serde_json::from_slice(&bytes)
            .map_err(|e| Error::SchemaViolation(format!("{}: {e}", path.display())))?;
        for sat in &satellites {
            sat.validate_invariants()
                .map_err(|e| Error::SchemaViolation(format!("{}: {e}", sat.id)))?;
        }
        by_constellation.insert(*constellation, satellites);
    }
    Ok(by_constellation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_input_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let result = load_upstream(tmp.path()).await;
        assert!(matches!(result, Err(Error::InputUnavailable(_))));
    }

    #[tokio::test]
    async fn malformed_json_is_schema_violation() {
        let tmp = tempfile::tempdir().unwrap();
        tokio::fs::write(tmp.path().join("starlink.json"), b"not json").await.unwrap();
        tokio::fs::write(tmp.path().join("oneweb.json"), b"[]").await.unwrap();
        let result = load_upstream(tmp.path()).await;
        assert!(matches!(result, Err(Error::SchemaViolation(_))));
    }
}
