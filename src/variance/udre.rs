use log::debug;

use crate::{provider::DegradationRecord, variance::VarianceRuntime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// User differential range error indicator (0..=15).
/// 14 means "not monitored", 15 means "do not use".
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Udrei(u8);

impl Udrei {
    /// Satellite is not monitored
    pub const NOT_MONITORED: Self = Self(14);

    /// Satellite must not be used
    pub const DO_NOT_USE: Self = Self(15);

    /// σ²UDRE (m²) for indicators 0..=13
    const SIGMA2_M2: [f64; 14] = [
        0.0520, 0.0924, 0.1444, 0.2830, 0.4678, 0.8315, 1.2992, 1.8709, 2.5465, 3.3260, 5.1968,
        20.7870, 230.9661, 2078.695,
    ];

    /// Builds a [Udrei], if `value` fits on 4 bits.
    pub fn new(value: u8) -> Option<Self> {
        if value < 16 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub(crate) fn from_bits(value: u8) -> Self {
        Self(value & 0x0f)
    }

    /// Indicator value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// True when this indicator forbids any use of the satellite
    pub fn is_unusable(&self) -> bool {
        self.0 >= Self::NOT_MONITORED.0
    }

    /// σ²UDRE (m²) from the lookup table, [None] for 14 and 15.
    pub fn sigma2_m2(&self) -> Option<f64> {
        Self::SIGMA2_M2.get(self.0 as usize).copied()
    }
}

impl std::fmt::Display for Udrei {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "UDREI={}", self.0)
    }
}

/// Why a satellite is excluded from the solution
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Exclusion {
    /// [Udrei::NOT_MONITORED]
    NotMonitored,
    /// [Udrei::DO_NOT_USE]
    DoNotUse,
    /// No integrity information for this satellite
    NoIntegrity,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotMonitored => write!(f, "not monitored"),
            Self::DoNotUse => write!(f, "do not use"),
            Self::NoIntegrity => write!(f, "no integrity"),
        }
    }
}

/// Outcome of the UDRE model: either a variance, or an exclusion marker.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UdreVariance {
    /// σ²UDRE (m²)
    Usable(f64),
    /// Satellite must be excluded from the solution
    Unusable(Exclusion),
}

impl UdreVariance {
    /// Variance (m²), when usable
    pub fn sigma2_m2(&self) -> Option<f64> {
        match self {
            Self::Usable(sigma2) => Some(*sigma2),
            Self::Unusable(_) => None,
        }
    }

    /// True when satellite is excluded
    pub fn is_unusable(&self) -> bool {
        matches!(self, Self::Unusable(_))
    }
}

/// Built-in UDRE model: table lookup, scaled by δUDRE² when
/// a clock-ephemeris covariance is available.
pub fn udre_variance(rtm: &VarianceRuntime, udrei: Udrei, record: &DegradationRecord) -> UdreVariance {
    let sigma2 = match udrei.sigma2_m2() {
        Some(sigma2) => sigma2,
        None if udrei == Udrei::NOT_MONITORED => {
            return UdreVariance::Unusable(Exclusion::NotMonitored)
        },
        None => return UdreVariance::Unusable(Exclusion::DoNotUse),
    };

    let delta_udre = match &record.covariance {
        Some(cov) => {
            let los_ecef = rtm.los.ecef(rtm.user);
            let delta = cov.delta_udre(&los_ecef, record.c_covariance);
            debug!(
                "{} ({}) - δUDRE={:.3} (scale exponent {})",
                rtm.t, rtm.los.sv, delta, cov.scale_exponent
            );
            delta
        },
        None => 1.0,
    };

    UdreVariance::Usable(sigma2 * delta_udre.powi(2))
}
