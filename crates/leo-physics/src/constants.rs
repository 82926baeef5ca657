//! Physical and mathematical constants, grounded on the teacher's
//! `sx9-orbital-simulator::constants` table and tightened to the values the
//! original Python engine actually used (`physics_calculation_engine.py`,
//! `trajectory_prediction_engine.py`).

use std::f64::consts::PI;

pub const DEG_TO_RAD: f64 = PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// Earth gravitational parameter, km^3/s^2 (`398600.4418`, matches both the
/// teacher and the original engine).
pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;

/// Same parameter in SI units (m^3/s^2), per `spec.md` §4.4.
pub const EARTH_MU_M3_S2: f64 = 3.986_004_418e14;

pub const EARTH_RADIUS_KM: f64 = 6378.137;

pub const SIDEREAL_DAY_SECONDS: f64 = 86164.0905;

pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Kepler solver tuning, verbatim from
/// `trajectory_prediction_engine.py::_solve_kepler_equation`.
pub const KEPLER_TOLERANCE: f64 = 1e-8;
pub const KEPLER_MAX_ITERATIONS: usize = 10;

/// 3GPP TS 36.133 RSRP measurement range.
pub const RSRP_MIN_DBM: f64 = -140.0;
pub const RSRP_MAX_DBM: f64 = -44.0;

/// User terminal antenna gain, per `spec.md` §4.4.
pub const USER_ANTENNA_GAIN_DBI: f64 = 35.0;

/// Per-constellation EIRP table, per `spec.md` §4.4.
#[derive(Debug, Clone, Copy)]
pub struct EirpEntry {
    pub eirp_dbw: f64,
    pub frequency_hz: f64,
}

pub fn eirp_table(constellation: leo_core::Constellation) -> EirpEntry {
    use leo_core::Constellation::*;
    match constellation {
        Starlink => EirpEntry {
            eirp_dbw: 37.5,
            frequency_hz: 20.2e9,
        },
        OneWeb => EirpEntry {
            eirp_dbw: 40.0,
            frequency_hz: 19.7e9,
        },
        Other => EirpEntry {
            eirp_dbw: 37.5,
            frequency_hz: 20.2e9,
        },
    }
}
