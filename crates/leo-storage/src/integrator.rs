//! C4 Storage Integrator: splits upstream data between the structured
//! index store and the bulk object store, with adaptive size-balance
//! analysis and never-block-the-pipeline failure semantics.

use crate::bulk::{BulkWriter, SatelliteBulkRecord};
use crate::index::{
    IndexStore, ProcessingSummaryRow, SatelliteIndexRow, StorageBalanceReport, StorageBalanceStatus,
};
use crate::Result;
use leo_core::model::{Constellation, Satellite};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Record-count bucket used to pick the adaptive index fraction
/// (`spec.md` §4.1 sizing contract: small 15%, medium 20%, large 25%).
fn adaptive_index_fraction(total_records: usize) -> f64 {
    match total_records {
        0..=1_000 => 0.15,
        1_001..=10_000 => 0.20,
        _ => 0.25,
    }
}

pub struct IntegrationOutcome {
    pub balance: StorageBalanceReport,
    pub satellites_integrated: usize,
}

/// Run the full C4 contract: `integrate(upstream_satellites) ->
/// (index_records, bulk_artifacts, balance_report)`.
pub async fn integrate(
    satellites_by_constellation: &HashMap<Constellation, Vec<Satellite>>,
    index_store: Arc<dyn IndexStore>,
    bulk_writer: Arc<dyn BulkWriter>,
    bulk_root: &Path,
) -> Result<IntegrationOutcome> {
    let index_connected = index_store.is_connected();
    if !index_connected {
        warn!("index store unreachable, degrading to volume_only mode");
    } else {
        index_store.init().await.unwrap_or_else(|e| {
            warn!(error = %e, "index store init failed, continuing degraded");
        });
    }

    let mut index_rows = Vec::new();
    let mut total_records = 0usize;
    let mut satellites_integrated = 0usize;

    for (constellation, satellites) in satellites_by_constellation {
        let records: Vec<SatelliteBulkRecord> = satellites
            .iter()
            .map(|sat| SatelliteBulkRecord {
                satellite_id: &sat.id,
                constellation: *constellation,
                position_timeseries: &sat.position_timeseries,
            })
            .collect();

        bulk_writer.write_timeseries(*constellation, &records).await?;

        for sat in satellites {
            let total_points = sat.position_timeseries.len() as i64;
            let visible_points = sat
                .position_timeseries
                .iter()
                .filter(|s| s.relative.is_visible)
                .count() as i64;
            let row = SatelliteIndexRow {
                satellite_id: sat.id.clone(),
                constellation: constellation.as_str().to_string(),
                norad_id: sat.norad_id.map(|n| n as i64),
                total_points,
                visible_points,
                visibility_ratio: if total_points > 0 {
                    visible_points as f64 / total_points as f64
                } else {
                    0.0
                },
            };
            total_records += total_points as usize;
            index_rows.push(row);
            satellites_integrated += 1;
        }

        if index_connected {
            let summary = ProcessingSummaryRow {
                id: format!("stage5-{}", constellation.as_str()),
                constellation: constellation.as_str().to_string(),
                stage: "stage5_integration".to_string(),
                total_sats: satellites.len() as i64,
                retention_rate: 1.0,
                processing_time_s: 0.0,
                size_mb: 0.0,
            };
            if let Err(e) = index_store.insert_processing_summary(&summary).await {
                warn!(error = %e, constellation = constellation.as_str(), "processing summary insert failed");
            }
        }
    }

    if index_connected {
        if let Err(e) = index_store.insert_satellite_rows(&index_rows).await {
            warn!(error = %e, "satellite index insert failed, treating as volume_only for this run");
        }
        index_store.commit().await.ok();
    }

    let bulk_bytes = crate::bulk::directory_size_bytes(bulk_root).await.unwrap_or(0);
    let index_fraction = adaptive_index_fraction(total_records);
    // Index store byte count is estimated from row count at a fixed
    // per-row footprint; real measurement requires a DB-side ANALYZE which
    // this pipeline does not perform.
    let estimated_index_bytes = (index_rows.len() as u64) * 128;
    let status = if index_connected {
        StorageBalanceStatus::Hybrid
    } else {
        StorageBalanceStatus::VolumeOnly
    };

    info!(
        satellites_integrated,
        index_connected, "storage integration complete"
    );

    Ok(IntegrationOutcome {
        balance: StorageBalanceReport {
            status,
            index_bytes: estimated_index_bytes,
            bulk_bytes,
            index_fraction,
            generated_at: chrono::Utc::now(),
        },
        satellites_integrated,
    })
}

/// Verify the round-trip invariant: `satellite_index.visible_points` summed
/// across satellites equals the total visible sample count actually
/// written to the bulk store (`spec.md` §8 invariant 5).
pub fn verify_round_trip(
    index_rows: &[SatelliteIndexRow],
    satellites: &[Satellite],
) -> std::result::Result<(), String> {
    let index_total: i64 = index_rows.iter().map(|r| r.visible_points).sum();
    let bulk_total: i64 = satellites
        .iter()
        .flat_map(|s| s.position_timeseries.iter())
        .filter(|s| s.relative.is_visible)
        .count() as i64;
    if index_total != bulk_total {
        return Err(format!(
            "round-trip mismatch: index={index_total} bulk={bulk_total}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_fraction_buckets() {
        assert_eq!(adaptive_index_fraction(500), 0.15);
        assert_eq!(adaptive_index_fraction(5_000), 0.20);
        assert_eq!(adaptive_index_fraction(50_000), 0.25);
    }

    #[test]
    fn round_trip_fails_on_mismatch() {
        let rows = vec![SatelliteIndexRow {
            satellite_id: "S1".into(),
            constellation: "starlink".into(),
            norad_id: None,
            total_points: 10,
            visible_points: 3,
            visibility_ratio: 0.3,
        }];
        assert!(verify_round_trip(&rows, &[]).is_err());
    }

    #[test]
    fn round_trip_passes_when_counts_match() {
        use chrono::DateTime;
        use leo_core::model::{
            Constellation, Eci, Geographic, ObserverRelative, OrbitalElements, PositionSample,
            VelocityEci,
        };

        let make_sample = |visible: bool| PositionSample {
            timestamp: DateTime::from_timestamp_millis(0).unwrap(),
            eci: Eci { x_km: 0.0, y_km: 0.0, z_km: 0.0 },
            velocity_eci: VelocityEci { vx_km_s: 0.0, vy_km_s: 0.0, vz_km_s: 0.0 },
            geographic: Geographic { lat_deg: 0.0, lon_deg: 0.0, alt_km: 550.0 },
            relative: ObserverRelative {
                elevation_deg: if visible { 20.0 } else { -5.0 },
                azimuth_deg: 0.0,
                range_km: 1000.0,
                is_visible: visible,
            },
        };

        let sat = Satellite {
            id: "S1".into(),
            norad_id: None,
            constellation: Constellation::Starlink,
            orbital_elements: OrbitalElements {
                semi_major_axis_km: 6921.0,
                eccentricity: 0.0,
                inclination_deg: 53.0,
                raan_deg: 0.0,
                arg_perigee_deg: 0.0,
                mean_anomaly_deg: 0.0,
                mean_motion_rev_per_day: 15.0,
                epoch: DateTime::from_timestamp_millis(0).unwrap(),
            },
            position_timeseries: vec![make_sample(true), make_sample(true), make_sample(false)],
        };

        let rows = vec![SatelliteIndexRow {
            satellite_id: "S1".into(),
            constellation: "starlink".into(),
            norad_id: None,
            total_points: 3,
            visible_points: 2,
            visibility_ratio: 2.0 / 3.0,
        }];

        assert!(verify_round_trip(&rows, &[sat]).is_ok());
    }
}
