//! Weighted least squares protection levels
use log::debug;
use nalgebra::{DMatrix, Matrix4};

use crate::{
    cfg::Config,
    constants::{K_H_PA, K_V, MIN_USABLE_SATELLITES},
    error::Error,
    observation::SbasObservation,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertical and horizontal alert limits of an operation.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlertLimits {
    /// Horizontal alert limit (m)
    pub hal_m: f64,
    /// Vertical alert limit (m), [None] for horizontal only operations
    pub val_m: Option<f64>,
}

impl AlertLimits {
    /// LPV-200 approach
    pub const LPV_200: Self = Self {
        hal_m: 40.0,
        val_m: Some(35.0),
    };

    /// APV-I approach
    pub const APV_I: Self = Self {
        hal_m: 40.0,
        val_m: Some(50.0),
    };

    /// Non precision approach
    pub const NPA: Self = Self {
        hal_m: 556.0,
        val_m: None,
    };
}

/// Protection levels of one epoch
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProtectionLevel {
    /// Bounds (m)
    Defined { vpl_m: f64, hpl_m: f64 },
    /// Less than four usable satellites
    InsufficientGeometry { usable: usize },
}

impl ProtectionLevel {
    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined { .. })
    }

    /// VPL (m)
    pub fn vpl_m(&self) -> Option<f64> {
        match self {
            Self::Defined { vpl_m, .. } => Some(*vpl_m),
            Self::InsufficientGeometry { .. } => None,
        }
    }

    /// HPL (m)
    pub fn hpl_m(&self) -> Option<f64> {
        match self {
            Self::Defined { hpl_m, .. } => Some(*hpl_m),
            Self::InsufficientGeometry { .. } => None,
        }
    }

    /// True when these levels lie within the [AlertLimits].
    /// Undefined levels are never available.
    pub fn is_available(&self, limits: &AlertLimits) -> bool {
        match self {
            Self::Defined { vpl_m, hpl_m } => {
                *hpl_m <= limits.hal_m && limits.val_m.map_or(true, |val_m| *vpl_m <= val_m)
            },
            Self::InsufficientGeometry { .. } => false,
        }
    }
}

/// Projects pseudo range variances into the position domain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProtectionLevelEngine {
    /// Vertical multiplier
    pub k_v: f64,
    /// Horizontal multiplier
    pub k_h: f64,
}

impl Default for ProtectionLevelEngine {
    fn default() -> Self {
        Self {
            k_v: K_V,
            k_h: K_H_PA,
        }
    }
}

impl ProtectionLevelEngine {
    pub fn new(k_v: f64, k_h: f64) -> Self {
        Self { k_v, k_h }
    }

    /// Engine using the multipliers of this [Config] and its navigation mode
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.k_v, cfg.k_h())
    }

    /// Resolves the [ProtectionLevel] of one epoch. All observations must
    /// share the same epoch. Unusable satellites are ignored.
    pub fn resolve(&self, observations: &[SbasObservation]) -> Result<ProtectionLevel, Error> {
        let t = match observations.first() {
            Some(first) => first.t(),
            None => return Ok(ProtectionLevel::InsufficientGeometry { usable: 0 }),
        };

        if observations.iter().any(|obs| obs.t() != t) {
            return Err(Error::InconsistentEpoch(t));
        }

        let rows = observations
            .iter()
            .filter_map(|obs| {
                obs.total_variance()
                    .map(|sigma2| (obs.line_of_sight().geometry_row(), sigma2))
            })
            .collect::<Vec<_>>();

        let pl = self.resolve_weighted(&rows)?;
        debug!("{} - {:?}", t, pl);
        Ok(pl)
    }

    /// Resolves the [ProtectionLevel] from geometry rows `[-e, -n, -u, 1]`
    /// and their total variance (m²).
    pub fn resolve_weighted(&self, rows: &[([f64; 4], f64)]) -> Result<ProtectionLevel, Error> {
        let usable = rows.len();
        if usable < MIN_USABLE_SATELLITES {
            return Ok(ProtectionLevel::InsufficientGeometry { usable });
        }

        let mut g = DMatrix::<f64>::zeros(usable, 4);
        let mut w = DMatrix::<f64>::zeros(usable, usable);

        for (i, (row, sigma2)) in rows.iter().enumerate() {
            if !(sigma2.is_finite() && *sigma2 > 0.0) {
                return Err(Error::InvalidVariance {
                    term: "total",
                    value: *sigma2,
                });
            }
            for (j, value) in row.iter().enumerate() {
                g[(i, j)] = *value;
            }
            w[(i, i)] = 1.0 / sigma2;
        }

        let normal = g.transpose() * &w * &g;
        let normal = Matrix4::<f64>::from_iterator(normal.iter().copied());

        let d = normal.try_inverse().ok_or(Error::MatrixInversion)?;

        let (d_ee, d_nn, d_uu, d_en) = (d[(0, 0)], d[(1, 1)], d[(2, 2)], d[(0, 1)]);

        if !(d_ee >= 0.0 && d_nn >= 0.0 && d_uu >= 0.0) || !d.iter().all(|x| x.is_finite()) {
            return Err(Error::MatrixInversion);
        }

        let d_major = ((d_ee + d_nn) / 2.0
            + (((d_ee - d_nn) / 2.0).powi(2) + d_en.powi(2)).sqrt())
        .sqrt();

        Ok(ProtectionLevel::Defined {
            vpl_m: self.k_v * d_uu.sqrt(),
            hpl_m: self.k_h * d_major,
        })
    }
}
