//! Ionospheric pierce point, thin shell model
use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    constants::{EARTH_RADIUS_KM, IONO_SHELL_HEIGHT_KM},
    geometry::{GeodeticPosition, LineOfSight},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [PiercePoint] where a line of sight crosses the ionospheric shell.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PiercePoint {
    /// Latitude in decimal degrees
    pub lat_deg: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    pub lon_deg: f64,
    /// Shell altitude (km)
    pub alt_km: f64,
    /// Obliquity factor, vertical to slant
    pub obliquity: f64,
}

/// Wraps a longitude (degrees) into [-180, 180]
pub(crate) fn wrap_longitude_deg(lon_deg: f64) -> f64 {
    let wrapped = (lon_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon_deg > 0.0 {
        180.0
    } else {
        wrapped
    }
}

impl PiercePoint {
    /// Computes the [PiercePoint] of this [LineOfSight] seen from `user`,
    /// for a shell at `shell_height_km` above a spherical Earth.
    pub fn new(user: &GeodeticPosition, los: &LineOfSight, shell_height_km: f64) -> Self {
        let (phi_u, lambda_u) = (user.lat_deg.to_radians(), user.lon_deg.to_radians());
        let (elev_rad, azim_rad) = (los.elevation_rad(), los.azimuth_rad());

        let fract = EARTH_RADIUS_KM / (EARTH_RADIUS_KM + shell_height_km);

        // Earth central angle between user and pierce point
        let psi = FRAC_PI_2 - elev_rad - (fract * elev_rad.cos()).clamp(-1.0, 1.0).asin();

        let sin_phi_pp = phi_u.sin() * psi.cos() + phi_u.cos() * psi.sin() * azim_rad.cos();
        let phi_pp = sin_phi_pp.clamp(-1.0, 1.0).asin();

        let cos_phi_pp = phi_pp.cos();
        let delta_lambda = if cos_phi_pp.abs() < f64::EPSILON {
            0.0
        } else {
            (psi.sin() * azim_rad.sin() / cos_phi_pp)
                .clamp(-1.0, 1.0)
                .asin()
        };

        // crossing the pole
        let polar_north =
            user.lat_deg > 70.0 && psi.tan() * azim_rad.cos() > (FRAC_PI_2 - phi_u).tan();
        let polar_south =
            user.lat_deg < -70.0 && -psi.tan() * azim_rad.cos() > (FRAC_PI_2 + phi_u).tan();

        let lambda_pp = if polar_north || polar_south {
            lambda_u + PI - delta_lambda
        } else {
            lambda_u + delta_lambda
        };

        let obliquity = (1.0 - (fract * elev_rad.cos()).powi(2)).max(f64::EPSILON).sqrt().recip();

        Self {
            lat_deg: phi_pp.to_degrees(),
            lon_deg: wrap_longitude_deg(lambda_pp.to_degrees()),
            alt_km: shell_height_km,
            obliquity,
        }
    }

    /// [PiercePoint] for the default 350 km shell
    pub fn with_default_shell(user: &GeodeticPosition, los: &LineOfSight) -> Self {
        Self::new(user, los, IONO_SHELL_HEIGHT_KM)
    }
}

#[cfg(test)]
mod test {
    use super::wrap_longitude_deg;

    #[test]
    fn longitude_wrapping() {
        assert_eq!(wrap_longitude_deg(0.0), 0.0);
        assert_eq!(wrap_longitude_deg(180.0), 180.0);
        assert_eq!(wrap_longitude_deg(-180.0), -180.0);
        assert_eq!(wrap_longitude_deg(190.0), -170.0);
        assert_eq!(wrap_longitude_deg(-190.0), 170.0);
        assert_eq!(wrap_longitude_deg(540.0), 180.0);
        assert!((wrap_longitude_deg(359.5) + 0.5).abs() < 1e-12);
    }
}
