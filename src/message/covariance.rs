//! MT28: clock-ephemeris covariance matrix
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::{
    error::Error,
    message::{bits::BitCursor, mask::MAX_MASKED_SATELLITES},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Satellite blocks per MT28
const COVARIANCE_BLOCKS: usize = 2;

/// [ClockEphemerisCovariance] of one satellite: Cholesky factor `R`
/// of the (ECEF position, clock) correction error covariance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockEphemerisCovariance {
    /// PRN mask number (1..=51)
    pub mask_number: usize,
    /// Scale exponent (0..=7)
    pub scale_exponent: u8,
    /// Upper triangular factor, scaling applied.
    pub r: Matrix4<f64>,
}

impl ClockEphemerisCovariance {
    fn decode(mask_number: usize, cursor: &mut BitCursor) -> Result<Self, Error> {
        let scale_exponent: u8 = cursor.unsigned(3)?;
        let scale = 2.0_f64.powi(scale_exponent as i32 - 5);

        let mut r = Matrix4::<f64>::zeros();
        for i in 0..4 {
            r[(i, i)] = cursor.unsigned_scaled(9, scale)?;
        }
        for (i, j) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
            r[(i, j)] = cursor.signed_scaled(10, scale)?;
        }

        Ok(Self {
            mask_number,
            scale_exponent,
            r,
        })
    }

    /// Covariance matrix `C = Rᵀ R`
    pub fn covariance(&self) -> Matrix4<f64> {
        self.r.transpose() * self.r
    }

    /// Covariance quantization term `ε_c`, from MT10 `C_covariance`.
    pub fn epsilon_c(&self, c_covariance: f64) -> f64 {
        c_covariance * 2.0_f64.powi(self.scale_exponent as i32 - 5)
    }

    /// δUDRE location specific inflation, for this user to satellite
    /// line of sight (ECEF unit vector).
    pub fn delta_udre(&self, los_ecef: &Vector3<f64>, c_covariance: f64) -> f64 {
        let i = Vector4::new(los_ecef[0], los_ecef[1], los_ecef[2], 1.0);
        let quad = (i.transpose() * self.covariance() * i)[(0, 0)];
        quad.max(0.0).sqrt() + self.epsilon_c(c_covariance)
    }
}

/// MT28 content: up to two [ClockEphemerisCovariance].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CovarianceMessage {
    /// Issue of data, PRN mask
    pub iodp: u8,
    /// Blocks designating a satellite. Mask number 0 designates an empty block.
    pub entries: Vec<ClockEphemerisCovariance>,
}

impl CovarianceMessage {
    pub(crate) fn decode(cursor: &mut BitCursor) -> Result<Self, Error> {
        let iodp = cursor.unsigned(2)?;
        let mut entries = Vec::with_capacity(COVARIANCE_BLOCKS);
        for _ in 0..COVARIANCE_BLOCKS {
            let start = cursor.position();
            let mask_number: usize = cursor.unsigned(6)?;
            if mask_number > MAX_MASKED_SATELLITES {
                return Err(Error::SlotOutOfRange {
                    mt: 28,
                    index: mask_number,
                    min: 0,
                    max: MAX_MASKED_SATELLITES + 1,
                });
            }
            if mask_number == 0 {
                cursor.skip(105 - (cursor.position() - start))?;
                continue;
            }
            entries.push(ClockEphemerisCovariance::decode(mask_number, cursor)?);
        }
        Ok(Self { iodp, entries })
    }
}
