//! Remediation ladder (`spec.md` §4.9): activate a backup satellite,
//! then redistribute constellation roles, then widen the elevation
//! threshold by one degree; report `NeedsAdjustment` if still failing.

use crate::grid::{evaluate_grid, sample_grid, CoverageMetrics, MAX_GAP_MINUTES, MIN_PASS_RATE};
use leo_core::ids::SatelliteId;
use leo_core::model::{Constellation, PoolConfiguration, Satellite};
use leo_phase::analyze_constellation_phase;
use std::collections::HashMap;
use tracing::info;

pub const BACKUP_POOL_FRACTION: f64 = 0.20;

pub fn backup_pool_size(primary_pool_size: usize) -> usize {
    ((primary_pool_size as f64) * BACKUP_POOL_FRACTION).round() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationStep {
    ActivateBackup,
    RedistributeRoles,
    WidenElevationThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuaranteeStatus {
    Guaranteed,
    NeedsAdjustment,
}

pub struct GuaranteeReport {
    pub status: GuaranteeStatus,
    pub steps_applied: Vec<RemediationStep>,
    pub metrics: CoverageMetrics,
    pub phase_diversity_score: f64,
    pub final_pool: PoolConfiguration,
}

fn metrics_pass(metrics: &CoverageMetrics, phase_diversity_score: f64) -> bool {
    metrics.starlink_pass_rate >= MIN_PASS_RATE
        && metrics.oneweb_pass_rate >= MIN_PASS_RATE
        && metrics.max_gap_minutes <= MAX_GAP_MINUTES
        && phase_diversity_score >= 0.7
}

fn phase_diversity(satellites: &HashMap<SatelliteId, &Satellite>, pool: &PoolConfiguration) -> f64 {
    let starlink: Vec<&Satellite> = pool.starlink_set.iter().filter_map(|id| satellites.get(id).copied()).collect();
    let oneweb: Vec<&Satellite> = pool.oneweb_set.iter().filter_map(|id| satellites.get(id).copied()).collect();

    let starlink_score = if starlink.is_empty() { 0.0 } else { analyze_constellation_phase(&starlink).diversity_score };
    let oneweb_score = if oneweb.is_empty() { 0.0 } else { analyze_constellation_phase(&oneweb).diversity_score };

    let total = (starlink.len() + oneweb.len()).max(1) as f64;
    (starlink_score * starlink.len() as f64 + oneweb_score * oneweb.len() as f64) / total
}

fn activate_backup(
    pool: &mut PoolConfiguration,
    backup_pool: &[SatelliteId],
    satellites: &HashMap<SatelliteId, &Satellite>,
    deficit_constellation: Constellation,
) -> bool {
    let used: std::collections::HashSet<SatelliteId> =
        pool.starlink_set.iter().chain(pool.oneweb_set.iter()).cloned().collect();
    let candidate = backup_pool.iter().find(|id| {
        !used.contains(id) && satellites.get(id).map(|s| s.constellation) == Some(deficit_constellation)
    });
    match candidate {
        Some(id) => {
            match deficit_constellation {
                Constellation::Starlink if pool.starlink_set.len() < 15 => {
                    pool.starlink_set.push(*id);
                    true
                }
                Constellation::OneWeb if pool.oneweb_set.len() < 6 => {
                    pool.oneweb_set.push(*id);
                    true
                }
                _ => false,
            }
        }
        None => false,
    }
}

/// Run the full remediation ladder against `pool`, re-verifying after
/// each step, and return the final state.
pub fn guarantee_coverage(
    satellites: &HashMap<SatelliteId, &Satellite>,
    pool: &PoolConfiguration,
    backup_pool: &[SatelliteId],
    window_start: chrono::DateTime<chrono::Utc>,
    elevation_threshold_deg: f64,
) -> GuaranteeReport {
    let mut current = pool.clone();
    let mut steps_applied = Vec::new();

    let mut samples = sample_grid(satellites, &current, window_start, None);
    let mut metrics = evaluate_grid(&samples);
    let mut diversity = phase_diversity(satellites, &current);

    if metrics_pass(&metrics, diversity) {
        return GuaranteeReport { status: GuaranteeStatus::Guaranteed, steps_applied, metrics, phase_diversity_score: diversity, final_pool: current };
    }

    // (a) activate backup satellite for whichever constellation is short.
    let deficit = if metrics.starlink_pass_rate < MIN_PASS_RATE { Constellation::Starlink } else { Constellation::OneWeb };
    if activate_backup(&mut current, backup_pool, satellites, deficit) {
        steps_applied.push(RemediationStep::ActivateBackup);
        samples = sample_grid(satellites, &current, window_start, None);
        metrics = evaluate_grid(&samples);
        diversity = phase_diversity(satellites, &current);
        if metrics_pass(&metrics, diversity) {
            info!(steps = steps_applied.len(), "coverage guaranteed after backup activation");
            return GuaranteeReport { status: GuaranteeStatus::Guaranteed, steps_applied, metrics, phase_diversity_score: diversity, final_pool: current };
        }
    }

    // (b) redistribute roles: try to fill the other constellation's slack too.
    let other_deficit = if deficit == Constellation::Starlink { Constellation::OneWeb } else { Constellation::Starlink };
    if activate_backup(&mut current, backup_pool, satellites, other_deficit) {
        steps_applied.push(RemediationStep::RedistributeRoles);
        samples = sample_grid(satellites, &current, window_start, None);
        metrics = evaluate_grid(&samples);
        diversity = phase_diversity(satellites, &current);
        if metrics_pass(&metrics, diversity) {
            info!(steps = steps_applied.len(), "coverage guaranteed after role redistribution");
            return GuaranteeReport { status: GuaranteeStatus::Guaranteed, steps_applied, metrics, phase_diversity_score: diversity, final_pool: current };
        }
    }

    // (c) widen elevation threshold by one degree.
    steps_applied.push(RemediationStep::WidenElevationThreshold);
    let widened_threshold = elevation_threshold_deg - 1.0;
    samples = sample_grid(satellites, &current, window_start, Some(widened_threshold));
    metrics = evaluate_grid(&samples);
    diversity = phase_diversity(satellites, &current);

    let status = if metrics_pass(&metrics, diversity) { GuaranteeStatus::Guaranteed } else { GuaranteeStatus::NeedsAdjustment };
    if status == GuaranteeStatus::NeedsAdjustment {
        tracing::warn!("coverage guarantee failed after full remediation ladder, reporting NeedsAdjustment");
    }

    GuaranteeReport { status, steps_applied, metrics, phase_diversity_score: diversity, final_pool: current }
}
