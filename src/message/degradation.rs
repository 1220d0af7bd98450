//! MT10: degradation parameters
use crate::{error::Error, message::bits::BitCursor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [DegradationParameters] (MT10) bound the aging of fast and long term corrections.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DegradationParameters {
    /// Range rate correction bound (m)
    pub b_rrc_m: f64,
    /// Long term correction quantization bound (m)
    pub c_ltc_lsb_m: f64,
    /// Long term velocity error bound (m/s)
    pub c_ltc_v1_m_s: f64,
    /// Long term update interval, velocity code 1 (s)
    pub i_ltc_v1_s: f64,
    /// Long term correction step bound, velocity code 0 (m)
    pub c_ltc_v0_m: f64,
    /// Long term update interval, velocity code 0 (s)
    pub i_ltc_v0_s: f64,
    /// GEO navigation message quantization bound (m)
    pub c_geo_lsb_m: f64,
    /// GEO velocity error bound (m/s)
    pub c_geo_v_m_s: f64,
    /// GEO update interval (s)
    pub i_geo_s: f64,
    /// En route fallback degradation (m)
    pub c_er_m: f64,
    /// Ionospheric step degradation (m)
    pub c_iono_step_m: f64,
    /// Ionospheric update interval (s)
    pub i_iono_s: f64,
    /// Ionospheric ramp degradation (m/s)
    pub c_iono_ramp_m_s: f64,
    /// Root sum square combination of the correction degradations
    pub rss_udre: bool,
    /// Root sum square combination of the ionospheric degradations
    pub rss_iono: bool,
    /// Covariance quantization term, [crate::message::ClockEphemerisCovariance]
    pub c_covariance: f64,
}

impl DegradationParameters {
    pub(crate) fn decode(cursor: &mut BitCursor) -> Result<Self, Error> {
        Ok(Self {
            b_rrc_m: cursor.unsigned_scaled(10, 0.002)?,
            c_ltc_lsb_m: cursor.unsigned_scaled(10, 0.002)?,
            c_ltc_v1_m_s: cursor.unsigned_scaled(10, 0.00005)?,
            i_ltc_v1_s: cursor.unsigned_scaled(9, 1.0)?,
            c_ltc_v0_m: cursor.unsigned_scaled(10, 0.002)?,
            i_ltc_v0_s: cursor.unsigned_scaled(9, 1.0)?,
            c_geo_lsb_m: cursor.unsigned_scaled(10, 0.0005)?,
            c_geo_v_m_s: cursor.unsigned_scaled(10, 0.00005)?,
            i_geo_s: cursor.unsigned_scaled(9, 1.0)?,
            c_er_m: cursor.unsigned_scaled(6, 0.5)?,
            c_iono_step_m: cursor.unsigned_scaled(10, 0.001)?,
            i_iono_s: cursor.unsigned_scaled(9, 1.0)?,
            c_iono_ramp_m_s: cursor.unsigned_scaled(10, 0.000005)?,
            rss_udre: cursor.flag()?,
            rss_iono: cursor.flag()?,
            c_covariance: cursor.unsigned_scaled(7, 0.1)?,
        })
    }
}
