//! ECI <-> geographic conversion via GMST rotation.

use crate::constants::{DEG_TO_RAD, EARTH_RADIUS_KM, RAD_TO_DEG, SIDEREAL_DAY_SECONDS};
use chrono::{DateTime, Utc};
use leo_core::model::{Eci, Geographic};

/// Greenwich Mean Sidereal Time, in radians, via a linear model anchored to
/// J2000 (good enough for the sub-day propagation windows this pipeline
/// operates over; full IAU precession/nutation is out of scope).
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    const J2000: i64 = 946_728_000; // 2000-01-01T12:00:00Z, unix seconds
    let seconds_since_j2000 = (t.timestamp_millis() as f64 / 1000.0) - J2000 as f64;
    let revolutions = seconds_since_j2000 / SIDEREAL_DAY_SECONDS;
    (revolutions * std::f64::consts::TAU).rem_euclid(std::f64::consts::TAU)
}

/// Rotate ECI to geographic (lat, lon, alt) at time `t`, treating Earth as
/// spherical (consistent with the circular-orbit approximation used
/// elsewhere in this engine).
pub fn eci_to_geographic(eci: Eci, t: DateTime<Utc>) -> Geographic {
    let theta = gmst_rad(t);
    let (cos_t, sin_t) = (theta.cos(), theta.sin());

    // ECI -> ECEF: rotate by -GMST about Z.
    let x_ecef = eci.x_km * cos_t + eci.y_km * sin_t;
    let y_ecef = -eci.x_km * sin_t + eci.y_km * cos_t;
    let z_ecef = eci.z_km;

    let r = (x_ecef * x_ecef + y_ecef * y_ecef + z_ecef * z_ecef).sqrt();
    let lat = (z_ecef / r).asin() * RAD_TO_DEG;
    let lon = y_ecef.atan2(x_ecef) * RAD_TO_DEG;
    let alt = r - EARTH_RADIUS_KM;

    Geographic {
        lat_deg: lat,
        lon_deg: lon,
        alt_km: alt,
    }
}

/// Inverse of [`eci_to_geographic`], for round-trip validation
/// (`spec.md` §3 invariant: "ECI and geographic must be derivable from each
/// other given epoch ± GMST").
pub fn geographic_to_eci(geo: Geographic, t: DateTime<Utc>) -> Eci {
    let theta = gmst_rad(t);
    let r = EARTH_RADIUS_KM + geo.alt_km;
    let lat = geo.lat_deg * DEG_TO_RAD;
    let lon = geo.lon_deg * DEG_TO_RAD;

    let x_ecef = r * lat.cos() * lon.cos();
    let y_ecef = r * lat.cos() * lon.sin();
    let z_ecef = r * lat.sin();

    let (cos_t, sin_t) = (theta.cos(), theta.sin());
    // ECEF -> ECI: rotate by +GMST about Z.
    let x_eci = x_ecef * cos_t - y_ecef * sin_t;
    let y_eci = x_ecef * sin_t + y_ecef * cos_t;

    Eci {
        x_km: x_eci,
        y_km: y_eci,
        z_km: z_ecef,
    }
}
