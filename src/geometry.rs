//! User / satellite geometry, as delivered by the geometry provider
use std::collections::BTreeMap;

use nalgebra::{Matrix3, Vector3};

use crate::{
    error::Error,
    prelude::{Epoch, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit vector tolerance
const UNIT_TOLERANCE: f64 = 1.0E-6;

/// User geodetic position
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPosition {
    /// Latitude in decimal degrees
    pub lat_deg: f64,
    /// Longitude in decimal degrees
    pub lon_deg: f64,
    /// Altitude above ellipsoid (m)
    pub alt_m: f64,
}

impl GeodeticPosition {
    /// Builds a new [GeodeticPosition]
    pub fn new(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            alt_m,
        }
    }

    /// Local ENU to ECEF rotation: columns are the east, north and up unit vectors.
    pub fn enu_to_ecef(&self) -> Matrix3<f64> {
        let (lat_rad, lon_rad) = (self.lat_deg.to_radians(), self.lon_deg.to_radians());
        Matrix3::<f64>::new(
            -lon_rad.sin(),
            -lat_rad.sin() * lon_rad.cos(),
            lat_rad.cos() * lon_rad.cos(),
            lon_rad.cos(),
            -lat_rad.sin() * lon_rad.sin(),
            lat_rad.cos() * lon_rad.sin(),
            0.0_f64,
            lat_rad.cos(),
            lat_rad.sin(),
        )
    }
}

/// [LineOfSight] from user to one satellite
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineOfSight {
    /// Satellite
    pub sv: SV,
    /// Elevation angle in degrees
    pub elevation_deg: f64,
    /// Azimuth angle in degrees, clockwise from north
    pub azimuth_deg: f64,
    /// Direction cosines, local (east, north, up) frame
    pub enu: Vector3<f64>,
}

impl LineOfSight {
    /// Builds [LineOfSight] from elevation and azimuth angles.
    pub fn from_elevation_azimuth(sv: SV, elevation_deg: f64, azimuth_deg: f64) -> Self {
        let (el, az) = (elevation_deg.to_radians(), azimuth_deg.to_radians());
        Self {
            sv,
            elevation_deg,
            azimuth_deg,
            enu: Vector3::new(el.cos() * az.sin(), el.cos() * az.cos(), el.sin()),
        }
    }

    /// Builds [LineOfSight] from ENU direction cosines, which must form a unit vector.
    pub fn from_enu(sv: SV, enu: Vector3<f64>) -> Result<Self, Error> {
        if !enu.iter().all(|c| c.is_finite()) || (enu.norm() - 1.0).abs() > UNIT_TOLERANCE {
            return Err(Error::InvalidGeometry(sv));
        }
        let elevation_deg = enu[2].clamp(-1.0, 1.0).asin().to_degrees();
        let mut azimuth_deg = enu[0].atan2(enu[1]).to_degrees();
        if azimuth_deg < 0.0 {
            azimuth_deg += 360.0;
        }
        Ok(Self {
            sv,
            elevation_deg,
            azimuth_deg,
            enu,
        })
    }

    /// Elevation angle in radians
    pub fn elevation_rad(&self) -> f64 {
        self.elevation_deg.to_radians()
    }

    /// Azimuth angle in radians
    pub fn azimuth_rad(&self) -> f64 {
        self.azimuth_deg.to_radians()
    }

    /// Line of sight unit vector, in ECEF
    pub fn ecef(&self, user: &GeodeticPosition) -> Vector3<f64> {
        user.enu_to_ecef() * self.enu
    }

    /// Row of the ENU + clock geometry matrix
    pub(crate) fn geometry_row(&self) -> [f64; 4] {
        [-self.enu[0], -self.enu[1], -self.enu[2], 1.0]
    }

    /// Checks this [LineOfSight] is physically valid (above horizon, unit vector)
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let valid = self.elevation_deg.is_finite()
            && self.azimuth_deg.is_finite()
            && self.elevation_deg >= 0.0
            && self.elevation_deg <= 90.0
            && (self.enu.norm() - 1.0).abs() <= UNIT_TOLERANCE;
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidGeometry(self.sv))
        }
    }
}

/// Geometry of one epoch
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochGeometry {
    /// User position
    pub user: GeodeticPosition,
    /// Tracked satellites
    pub lines_of_sight: Vec<LineOfSight>,
}

/// [GeometryProvider] is implemented by the positioning layer, which owns
/// the user and satellite geometry. Observations borrow from it.
pub trait GeometryProvider {
    /// User position and tracked satellites at this [Epoch]
    fn geometry(&self, t: Epoch) -> Option<&EpochGeometry>;
}

impl GeometryProvider for BTreeMap<Epoch, EpochGeometry> {
    fn geometry(&self, t: Epoch) -> Option<&EpochGeometry> {
        self.get(&t)
    }
}
