use crate::{
    constants::{G, R_D, SIGMA_TVE_M, STD_LAPSE_RATE_K_M, STD_TEMPERATURE_K},
    variance::VarianceRuntime,
};

/// Tropospheric mapping function, vertical to slant.
pub(crate) fn mapping_function(elev_rad: f64) -> f64 {
    1.001_f64 / (0.002001_f64 + elev_rad.sin().powi(2)).sqrt()
}

/// Vertical error scaling with altitude, from the standard atmosphere
/// pressure profile. Vanishes above the troposphere.
pub(crate) fn height_factor(alt_m: f64) -> f64 {
    let value = 1.0_f64 - STD_LAPSE_RATE_K_M * alt_m / STD_TEMPERATURE_K;
    if value <= 0.0 {
        0.0
    } else {
        value.powf(G / R_D / STD_LAPSE_RATE_K_M)
    }
}

/// Built-in tropospheric model: σ²tropo = (σTVE(h) m(El))²
pub fn tropo_variance(rtm: &VarianceRuntime) -> f64 {
    let sigma_tve = SIGMA_TVE_M * height_factor(rtm.user.alt_m);
    (sigma_tve * mapping_function(rtm.los.elevation_rad())).powi(2)
}
