//! MT39: SBAS satellite ephemeris and clock, part 1
use std::f64::consts::PI;

use crate::{
    constants::SBAS_PRN_OFFSET,
    error::Error,
    message::bits::BitCursor,
    prelude::{Constellation, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest valid slot number (PRN 158)
pub const MAX_SLOT: usize = 39;

/// 2⁻¹⁹ semicircles, in radians
const HARMONIC_LSB_RAD: f64 = PI / 524_288.0;

/// 7/8 x 2⁻²² semicircles, in radians
const INCLINATION_LSB_RAD: f64 = 7.0 * PI / 8.0 / 4_194_304.0;

/// 2⁻³³ semicircles, in radians
const ANGLE_LSB_RAD: f64 = PI / 8_589_934_592.0;

/// Clock offset resolution (m)
const AGF0_LSB_M: f64 = 0.02;

/// Clock drift resolution (m/s)
const AGF1_LSB_M_S: f64 = 4.0E-5;

/// [GeoEphemeris] (MT39): orbital and clock parameters of one SBAS satellite,
/// stored by slot number.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoEphemeris {
    /// Slot number (1..=39)
    pub slot: usize,
    /// Broadcast PRN (slot + 119)
    pub prn: u8,
    /// Issue of data, GEO
    pub iodg: u8,
    /// Service provider ID
    pub provider: u8,
    /// Cosine harmonic correction to the argument of latitude (rad)
    pub cuc_rad: f64,
    /// Sine harmonic correction to the argument of latitude (rad)
    pub cus_rad: f64,
    /// Inclination (rad)
    pub i_rad: f64,
    /// Longitude of ascending node (rad)
    pub omega0_rad: f64,
    /// Argument of perigee (rad)
    pub omega_rad: f64,
    /// Mean anomaly (rad)
    pub m0_rad: f64,
    /// Clock offset (m)
    pub agf0_m: f64,
    /// Clock drift (m/s)
    pub agf1_m_s: f64,
}

impl GeoEphemeris {
    pub(crate) fn decode(cursor: &mut BitCursor) -> Result<Self, Error> {
        let slot: usize = cursor.unsigned(6)?;
        if slot == 0 || slot > MAX_SLOT {
            return Err(Error::SlotOutOfRange {
                mt: 39,
                index: slot,
                min: 1,
                max: MAX_SLOT + 1,
            });
        }
        Ok(Self {
            slot,
            prn: slot as u8 + SBAS_PRN_OFFSET,
            iodg: cursor.unsigned(2)?,
            provider: cursor.unsigned(5)?,
            cuc_rad: cursor.signed_scaled(19, HARMONIC_LSB_RAD)?,
            cus_rad: cursor.signed_scaled(19, HARMONIC_LSB_RAD)?,
            i_rad: cursor.unsigned_scaled(22, INCLINATION_LSB_RAD)?,
            omega0_rad: cursor.signed_scaled(34, ANGLE_LSB_RAD)?,
            omega_rad: cursor.signed_scaled(34, ANGLE_LSB_RAD)?,
            m0_rad: cursor.signed_scaled(34, ANGLE_LSB_RAD)?,
            agf0_m: cursor.signed_scaled(25, AGF0_LSB_M)?,
            agf1_m_s: cursor.signed_scaled(16, AGF1_LSB_M_S)?,
        })
    }

    /// Broadcasting [SV]
    pub fn sv(&self) -> SV {
        SV::new(Constellation::SBAS, self.prn - 100)
    }

    /// SBAS system operated by this service provider
    pub fn provider_system(&self) -> Option<Constellation> {
        match self.provider {
            0 => Some(Constellation::WAAS),
            1 => Some(Constellation::EGNOS),
            2 => Some(Constellation::MSAS),
            3 => Some(Constellation::GAGAN),
            4 => Some(Constellation::SDCM),
            5 => Some(Constellation::BDSBAS),
            6 => Some(Constellation::KASS),
            7 => Some(Constellation::ASBAS),
            8 => Some(Constellation::SPAN),
            _ => None,
        }
    }
}
