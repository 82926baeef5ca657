//! Multi-level cross-stage validation framework (C5). Checks are plain
//! data (`ValidationCheck`), category results fold from checks
//! (`ValidationResult::from_checks`), and the overall report folds from
//! category results (`aggregator::aggregate`). No category holds state or
//! raises — every function here is total over its inputs.

pub mod aggregator;
pub mod checks;

pub use aggregator::{aggregate, categories_for_level, Grade, ValidationReport};
pub use checks::{
    academic_standards_checks, coverage_checks, cross_stage_checks, diversity_checks,
    physics_checks, quality_checks, structure_checks,
};

use leo_core::config::ValidationLevel;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Everything a caller needs to run every category. Fields unused by a
/// given `ValidationLevel` are simply not read.
pub struct ValidationInput {
    pub pool_size: usize,
    pub pool_size_range: (usize, usize),
    pub required_field_completeness: f64,
    pub ids_unique: bool,
    pub quality_scores: Vec<f64>,
    pub quality_threshold: f64,
    pub starlink_coverage_pass_rate: f64,
    pub oneweb_coverage_pass_rate: f64,
    pub max_gap_minutes: f64,
    pub phase_diversity_score: f64,
    pub constellation_counts: HashMap<String, usize>,
    pub altitude_diversity: f64,
    pub orbital_velocities_km_s: Vec<f64>,
    pub orbital_periods_minutes: Vec<f64>,
    pub fspl_db: Vec<f64>,
    pub coverage_areas_km2: Vec<f64>,
    pub stage4_count: usize,
    pub stage5_count: usize,
    pub time_range_hours_by_constellation: HashMap<String, f64>,
    pub utc_compliant: bool,
    pub millisecond_precision: bool,
    pub authentic_data_ratio: f64,
    pub standard_method_ratio: f64,
    pub reproducibility_proxy: f64,
}

const DURATION_BUDGET: Duration = Duration::from_secs(5);

/// Run the categories selected by `requested_level`. If the wall-clock
/// exceeds the 5-second budget and the level was above FAST, re-runs at
/// FAST and reports the downgrade (`spec.md` §4.11 auto-downgrade rule).
pub fn validate(requested_level: ValidationLevel, input: &ValidationInput) -> ValidationReport {
    let start = Instant::now();
    let categories = run_categories(requested_level, input);
    let elapsed = start.elapsed();

    if elapsed > DURATION_BUDGET && requested_level != ValidationLevel::Fast {
        let fast_start = Instant::now();
        let fast_categories = run_categories(ValidationLevel::Fast, input);
        return aggregate(requested_level, ValidationLevel::Fast, fast_start.elapsed(), fast_categories);
    }

    aggregate(requested_level, requested_level, elapsed, categories)
}

fn run_categories(
    level: ValidationLevel,
    input: &ValidationInput,
) -> Vec<leo_core::model::ValidationResult> {
    let wanted = categories_for_level(level);
    let mut results = Vec::new();

    if wanted.contains(&"structure") {
        results.push(structure_checks(
            input.pool_size,
            input.pool_size_range,
            input.required_field_completeness,
            input.ids_unique,
        ));
    }
    if wanted.contains(&"physics") {
        results.push(physics_checks(
            &input.orbital_velocities_km_s,
            &input.orbital_periods_minutes,
            &input.fspl_db,
            &input.coverage_areas_km2,
        ));
    }
    if wanted.contains(&"quality") {
        results.push(quality_checks(&input.quality_scores, input.quality_threshold));
    }
    if wanted.contains(&"diversity") {
        results.push(diversity_checks(&input.constellation_counts, input.altitude_diversity));
    }
    if wanted.contains(&"coverage") {
        results.push(coverage_checks(
            input.starlink_coverage_pass_rate,
            input.oneweb_coverage_pass_rate,
            input.max_gap_minutes,
            input.phase_diversity_score,
        ));
    }
    if wanted.contains(&"cross_stage") {
        results.push(cross_stage_checks(
            input.stage4_count,
            input.stage5_count,
            &input.time_range_hours_by_constellation,
            input.utc_compliant,
            input.millisecond_precision,
        ));
    }
    if wanted.contains(&"academic_standards") {
        results.push(academic_standards_checks(
            input.authentic_data_ratio,
            input.standard_method_ratio,
            input.reproducibility_proxy,
        ));
    }

    results
}
