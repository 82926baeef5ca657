//! Pure, stateless orbital mechanics and link-budget calculator (C1).
//!
//! Every function here is a pure function of its arguments — no shared
//! state, no I/O, no randomness beyond the id-seeded deterministic terms in
//! [`link_budget::rsrp_from_elevation_and_constellation`].

pub mod constants;
pub mod coordinates;
pub mod link_budget;
pub mod orbit;

pub use constants::{eirp_table, EirpEntry, EARTH_MU_KM3_S2, RSRP_MAX_DBM, RSRP_MIN_DBM};
pub use coordinates::{eci_to_geographic, geographic_to_eci, gmst_rad};
pub use link_budget::{
    doppler_shift_hz, friis_fspl_db, ground_footprint_area_km2, ground_footprint_radius_km,
    itu_atmospheric_loss_db, rsrp_from_elevation_and_constellation, slant_range_km,
};
pub use orbit::{
    orbital_period_minutes, orbital_plane_to_eci, orbital_velocity_km_s,
    propagate_mean_anomaly_deg, solve_kepler, true_anomaly,
};
