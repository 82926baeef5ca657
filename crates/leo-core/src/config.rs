//! Environment-variable configuration, per `spec.md` §6. No CLI parsing —
//! the orchestrator binary is the sole consumer and reads `std::env`
//! directly at startup.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Fast,
    Standard,
    Comprehensive,
}

impl ValidationLevel {
    fn parse(raw: &str) -> Result<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "FAST" => Ok(Self::Fast),
            "STANDARD" => Ok(Self::Standard),
            "COMPREHENSIVE" => Ok(Self::Comprehensive),
            other => Err(Error::Config(format!(
                "unrecognized VALIDATION_LEVEL: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverLocation {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_km: f64,
}

/// NTPU, the default ground observer per `spec.md` §6.
impl Default for ObserverLocation {
    fn default() -> Self {
        Self {
            lat_deg: 24.9441667,
            lon_deg: 121.3713889,
            alt_km: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub postgres: Option<PostgresConfig>,
    pub observer: ObserverLocation,
    pub sample_mode: bool,
    pub validation_level: ValidationLevel,
    pub elevation_thresholds_deg: Vec<f64>,
    pub stage5_timeout: Duration,
    pub stage5_sample_timeout: Duration,
    pub stage6_timeout: Duration,
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_f64(key: &str, raw: &str) -> Result<f64> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{key} is not a valid number: {raw}")))
}

impl RunConfig {
    /// Load from the process environment, applying the defaults listed in
    /// `spec.md` §6 for every option left unset.
    pub fn from_env() -> Result<Self> {
        let input_dir = env_var("INPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./input"));
        let output_dir = env_var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        let postgres = env_var("PG_HOST").map(|host| -> Result<PostgresConfig> {
            Ok(PostgresConfig {
                host,
                port: match env_var("PG_PORT") {
                    Some(p) => p
                        .parse()
                        .map_err(|_| Error::Config(format!("PG_PORT is not a valid port: {p}")))?,
                    None => 5432,
                },
                dbname: env_var("PG_DB").unwrap_or_else(|| "leo_constellation".to_string()),
                user: env_var("PG_USER").unwrap_or_else(|| "postgres".to_string()),
                password: env_var("PG_PASSWORD").unwrap_or_default(),
            })
        });
        let postgres = postgres.transpose()?;

        let mut observer = ObserverLocation::default();
        if let Some(v) = env_var("OBSERVER_LAT") {
            observer.lat_deg = parse_f64("OBSERVER_LAT", &v)?;
        }
        if let Some(v) = env_var("OBSERVER_LON") {
            observer.lon_deg = parse_f64("OBSERVER_LON", &v)?;
        }
        if let Some(v) = env_var("OBSERVER_ALT_KM") {
            observer.alt_km = parse_f64("OBSERVER_ALT_KM", &v)?;
        }

        let sample_mode = env_var("SAMPLE_MODE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let validation_level = match env_var("VALIDATION_LEVEL") {
            Some(raw) => ValidationLevel::parse(&raw)?,
            None => ValidationLevel::Standard,
        };

        let elevation_thresholds_deg = match env_var("ELEVATION_THRESHOLDS") {
            Some(raw) => raw
                .split(',')
                .map(|s| parse_f64("ELEVATION_THRESHOLDS", s.trim()))
                .collect::<Result<Vec<_>>>()?,
            None => vec![5.0, 10.0, 15.0],
        };

        Ok(Self {
            input_dir,
            output_dir,
            postgres,
            observer,
            sample_mode,
            validation_level,
            elevation_thresholds_deg,
            stage5_timeout: Duration::from_secs(180),
            stage5_sample_timeout: Duration::from_secs(300),
            stage6_timeout: Duration::from_secs(600),
        })
    }

    pub fn output_subpath(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        // SAFETY in tests: env access is not concurrent here.
        for key in [
            "INPUT_DIR",
            "OUTPUT_DIR",
            "PG_HOST",
            "OBSERVER_LAT",
            "SAMPLE_MODE",
            "VALIDATION_LEVEL",
            "ELEVATION_THRESHOLDS",
        ] {
            std::env::remove_var(key);
        }
        let cfg = RunConfig::from_env().unwrap();
        assert_eq!(cfg.observer, ObserverLocation::default());
        assert!(!cfg.sample_mode);
        assert_eq!(cfg.validation_level, ValidationLevel::Standard);
        assert_eq!(cfg.elevation_thresholds_deg, vec![5.0, 10.0, 15.0]);
        assert!(cfg.postgres.is_none());
    }

    #[test]
    fn rejects_bad_validation_level() {
        std::env::set_var("VALIDATION_LEVEL", "YOLO");
        let result = RunConfig::from_env();
        std::env::remove_var("VALIDATION_LEVEL");
        assert!(result.is_err());
    }
}
