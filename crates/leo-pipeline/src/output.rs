//! Output builder (C13, `spec.md` §4.13): assembles the single canonical
//! JSON artifact plus a replay snapshot under `validation_snapshots/`.

use chrono::{DateTime, Utc};
use leo_coverage::{CoverageMetrics, GuaranteeStatus, RemediationStep};
use leo_optimizer::ObjectiveScores;
use leo_storage::StorageBalanceReport;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Serialize)]
pub struct StageMetrics {
    pub stage: String,
    pub duration_ms: u64,
    pub metrics: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ValidationCategorySummary {
    pub category: String,
    pub status: String,
    pub pass_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct ValidationSummary {
    pub level_applied: String,
    pub downgraded: bool,
    pub overall_pass_rate: f64,
    pub grade: String,
    pub zero_tolerance_violations: Vec<String>,
    pub categories: Vec<ValidationCategorySummary>,
}

#[derive(Debug, Serialize)]
pub struct CoverageSummary {
    pub status: String,
    pub steps_applied: Vec<String>,
    pub metrics: CoverageMetricsSummary,
    pub phase_diversity_score: f64,
}

#[derive(Debug, Serialize)]
pub struct CoverageMetricsSummary {
    pub starlink_pass_rate: f64,
    pub oneweb_pass_rate: f64,
    pub max_gap_minutes: f64,
}

impl From<&CoverageMetrics> for CoverageMetricsSummary {
    fn from(m: &CoverageMetrics) -> Self {
        Self { starlink_pass_rate: m.starlink_pass_rate, oneweb_pass_rate: m.oneweb_pass_rate, max_gap_minutes: m.max_gap_minutes }
    }
}

fn step_name(step: RemediationStep) -> &'static str {
    match step {
        RemediationStep::ActivateBackup => "activate_backup",
        RemediationStep::RedistributeRoles => "redistribute_roles",
        RemediationStep::WidenElevationThreshold => "widen_elevation_threshold",
    }
}

#[derive(Debug, Serialize)]
pub struct AcademicComplianceBlock {
    pub zero_tolerance_passed: bool,
    pub coverage_requirement_met: bool,
    pub scientific_design_citation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OutputArtifact {
    pub generated_at: DateTime<Utc>,
    pub final_pool: leo_core::model::PoolConfiguration,
    pub optimization_trace: ObjectiveScores,
    pub storage_balance: StorageBalanceReport,
    pub validation: ValidationSummary,
    pub coverage: CoverageSummary,
    pub rl_dataset: leo_rl_dataset::DatasetConfig,
    pub academic_compliance: AcademicComplianceBlock,
    pub stage_metrics: Vec<StageMetrics>,
}

pub fn build_artifact(
    generated_at: DateTime<Utc>,
    final_pool: leo_core::model::PoolConfiguration,
    optimization_trace: ObjectiveScores,
    storage_balance: StorageBalanceReport,
    validation_report: &leo_validation::ValidationReport,
    coverage_report: &leo_coverage::GuaranteeReport,
    rl_dataset: leo_rl_dataset::DatasetConfig,
    stage_metrics: Vec<StageMetrics>,
) -> OutputArtifact {
    let validation = ValidationSummary {
        level_applied: format!("{:?}", validation_report.level_applied),
        downgraded: validation_report.downgraded,
        overall_pass_rate: validation_report.overall_pass_rate,
        grade: validation_report.grade.as_str().to_string(),
        zero_tolerance_violations: validation_report.zero_tolerance_violations.clone(),
        categories: validation_report
            .categories
            .iter()
            .map(|c| ValidationCategorySummary {
                category: c.category.clone(),
                status: format!("{:?}", c.status),
                pass_rate: c.pass_rate,
            })
            .collect(),
    };

    let coverage = CoverageSummary {
        status: match coverage_report.status {
            GuaranteeStatus::Guaranteed => "guaranteed".to_string(),
            GuaranteeStatus::NeedsAdjustment => "needs_adjustment".to_string(),
        },
        steps_applied: coverage_report.steps_applied.iter().copied().map(step_name).map(str::to_string).collect(),
        metrics: (&coverage_report.metrics).into(),
        phase_diversity_score: coverage_report.phase_diversity_score,
    };

    let academic_compliance = AcademicComplianceBlock {
        zero_tolerance_passed: validation.zero_tolerance_violations.is_empty(),
        coverage_requirement_met: matches!(coverage_report.status, GuaranteeStatus::Guaranteed),
        scientific_design_citation: "3GPP TS 38.331 S5.5.4; ITU-R P.618; Kepler two-body propagation",
    };

    OutputArtifact {
        generated_at,
        final_pool,
        optimization_trace,
        storage_balance,
        validation,
        coverage,
        rl_dataset,
        academic_compliance,
        stage_metrics,
    }
}

/// Write the artifact as canonical pretty JSON plus a byte-identical
/// snapshot under `validation_snapshots/` for replay.
pub async fn write_artifact(output_dir: &Path, artifact: &OutputArtifact) -> std::io::Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(output_dir).await?;
    let snapshots_dir = output_dir.join("validation_snapshots");
    fs::create_dir_all(&snapshots_dir).await?;

    let payload = serde_json::to_vec_pretty(artifact)?;

    let artifact_path = output_dir.join("stage6_output.json");
    let mut file = fs::File::create(&artifact_path).await?;
    file.write_all(&payload).await?;
    file.flush().await?;

    let snapshot_name = format!("snapshot_{}.json", artifact.generated_at.timestamp_millis());
    let snapshot_path = snapshots_dir.join(snapshot_name);
    let mut snapshot_file = fs::File::create(&snapshot_path).await?;
    snapshot_file.write_all(&payload).await?;
    snapshot_file.flush().await?;

    Ok((artifact_path, snapshot_path))
}
