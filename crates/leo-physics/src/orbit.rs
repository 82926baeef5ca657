//! Orbital mechanics primitives: velocity, period, Kepler's equation, and
//! the ECI/orbital-plane transform. Grounded on
//! `trajectory_prediction_engine.py::_calculate_sgp4_position` and
//! `_solve_kepler_equation`, and the teacher's
//! `sx9-orbital-simulator::orbit` module shape.

use crate::constants::{EARTH_MU_KM3_S2, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE};
use leo_core::model::Eci;

/// `√(μ/a)`, circular-orbit velocity in km/s for semi-major axis `a_km`.
pub fn orbital_velocity_km_s(a_km: f64) -> f64 {
    (EARTH_MU_KM3_S2 / a_km).sqrt()
}

/// Kepler's third law, orbital period in minutes.
pub fn orbital_period_minutes(a_km: f64) -> f64 {
    let period_s = 2.0 * std::f64::consts::PI * (a_km.powi(3) / EARTH_MU_KM3_S2).sqrt();
    period_s / 60.0
}

/// Newton iteration solving Kepler's equation `M = E - e sin E` for the
/// eccentric anomaly `E`, given mean anomaly `M` (radians) and eccentricity
/// `e`. Tolerance `1e-8`, max 10 iterations — verbatim from the original
/// engine.
pub fn solve_kepler(mean_anomaly_rad: f64, eccentricity: f64) -> f64 {
    let mut e = mean_anomaly_rad;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let f = e - eccentricity * e.sin() - mean_anomaly_rad;
        let f_prime = 1.0 - eccentricity * e.cos();
        let delta = f / f_prime;
        e -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    e
}

/// True anomaly from eccentric anomaly and eccentricity.
pub fn true_anomaly(eccentric_anomaly_rad: f64, eccentricity: f64) -> f64 {
    2.0 * ((1.0 + eccentricity).sqrt() * (eccentric_anomaly_rad / 2.0).sin())
        .atan2((1.0 - eccentricity).sqrt() * (eccentric_anomaly_rad / 2.0).cos())
}

/// Orbital-plane to ECI rotation (3-1-3 Euler sequence: RAAN, inclination,
/// argument of perigee), all angles in radians.
pub fn orbital_plane_to_eci(
    x_orbital_km: f64,
    y_orbital_km: f64,
    inclination_rad: f64,
    raan_rad: f64,
    arg_perigee_rad: f64,
) -> Eci {
    let (cos_raan, sin_raan) = (raan_rad.cos(), raan_rad.sin());
    let (cos_inc, sin_inc) = (inclination_rad.cos(), inclination_rad.sin());
    let (cos_arg, sin_arg) = (arg_perigee_rad.cos(), arg_perigee_rad.sin());

    // Rotate by argument of perigee within the orbital plane, then by
    // inclination, then by RAAN — the standard perifocal-to-ECI sequence.
    let x_p = x_orbital_km * cos_arg - y_orbital_km * sin_arg;
    let y_p = x_orbital_km * sin_arg + y_orbital_km * cos_arg;

    let x_i = x_p;
    let y_i = y_p * cos_inc;
    let z_i = y_p * sin_inc;

    let x = x_i * cos_raan - y_i * sin_raan;
    let y = x_i * sin_raan + y_i * cos_raan;
    let z = z_i;

    Eci {
        x_km: x,
        y_km: y,
        z_km: z,
    }
}

/// Propagate mean anomaly forward from epoch by `dt_minutes`, in degrees.
pub fn propagate_mean_anomaly_deg(
    mean_anomaly_deg: f64,
    mean_motion_rev_per_day: f64,
    dt_minutes: f64,
) -> f64 {
    let rev_per_minute = mean_motion_rev_per_day / (24.0 * 60.0);
    (mean_anomaly_deg + rev_per_minute * 360.0 * dt_minutes).rem_euclid(360.0)
}
