//! MT2 to MT5 (fast corrections), MT6 (integrity information)
//! and MT7 (fast correction degradation factors)
use crate::{
    cfg::NavigationMode,
    error::Error,
    message::{bits::BitCursor, mask::MAX_MASKED_SATELLITES, MessageType},
    prelude::Epoch,
    variance::Udrei,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of satellites covered by each fast correction message
pub const FAST_CORRECTIONS_PER_MESSAGE: usize = 13;

/// Fast correction resolution (meters)
const FC_LSB_M: f64 = 0.125;

/// [FastCorrections] broadcast by MT2 (mask numbers 1..=13),
/// MT3 (14..=26), MT4 (27..=39) and MT5 (40..=51).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FastCorrections {
    /// Message type, 2 to 5
    pub mt: MessageType,
    /// Time of applicability (reception time)
    pub t: Epoch,
    /// Issue of data, fast corrections
    pub iodf: u8,
    /// Issue of data, PRN mask
    pub iodp: u8,
    /// Pseudo range corrections (meters)
    pub corrections_m: [f64; FAST_CORRECTIONS_PER_MESSAGE],
    /// [Udrei] for each satellite
    pub udrei: [Udrei; FAST_CORRECTIONS_PER_MESSAGE],
}

impl FastCorrections {
    pub(crate) fn decode(mt: MessageType, t: Epoch, cursor: &mut BitCursor) -> Result<Self, Error> {
        let iodf = cursor.unsigned(2)?;
        let iodp = cursor.unsigned(2)?;

        let mut corrections_m = [0.0_f64; FAST_CORRECTIONS_PER_MESSAGE];
        for fc in corrections_m.iter_mut() {
            *fc = cursor.signed_scaled(12, FC_LSB_M)?;
        }

        let mut udrei = [Udrei::default(); FAST_CORRECTIONS_PER_MESSAGE];
        for value in udrei.iter_mut() {
            *value = Udrei::from_bits(cursor.unsigned(4)?);
        }

        Ok(Self {
            mt,
            t,
            iodf,
            iodp,
            corrections_m,
            udrei,
        })
    }

    /// First mask number covered by this message
    pub fn first_mask_number(&self) -> usize {
        (self.mt as usize).saturating_sub(2) * FAST_CORRECTIONS_PER_MESSAGE + 1
    }

    fn index(&self, mask_number: usize) -> Option<usize> {
        let first = self.first_mask_number();
        if mask_number < first || mask_number > MAX_MASKED_SATELLITES {
            return None;
        }
        let index = mask_number - first;
        if index < FAST_CORRECTIONS_PER_MESSAGE {
            Some(index)
        } else {
            None
        }
    }

    /// [Udrei] of this (1-based) mask number, if covered
    pub fn udrei(&self, mask_number: usize) -> Option<Udrei> {
        self.index(mask_number).map(|i| self.udrei[i])
    }

    /// Fast correction (meters) of this (1-based) mask number, if covered
    pub fn correction_m(&self, mask_number: usize) -> Option<f64> {
        self.index(mask_number).map(|i| self.corrections_m[i])
    }
}

/// [IntegrityInfo] (MT6) refreshes the [Udrei] of all masked satellites.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegrityInfo {
    /// Reception time
    pub t: Epoch,
    /// IODF of MT2 to MT5 this message applies to
    pub iodf: [u8; 4],
    udrei: Vec<Udrei>,
}

impl IntegrityInfo {
    pub(crate) fn decode(t: Epoch, cursor: &mut BitCursor) -> Result<Self, Error> {
        let mut iodf = [0_u8; 4];
        for value in iodf.iter_mut() {
            *value = cursor.unsigned(2)?;
        }
        let udrei = (0..MAX_MASKED_SATELLITES)
            .map(|_| cursor.unsigned(4).map(Udrei::from_bits))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { t, iodf, udrei })
    }

    /// [Udrei] of this (1-based) mask number
    pub fn udrei(&self, mask_number: usize) -> Option<Udrei> {
        mask_number
            .checked_sub(1)
            .and_then(|i| self.udrei.get(i))
            .copied()
    }
}

/// Fast correction degradation factor indicator (0..=15), see [FastCorrectionDegradation].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DegradationFactor(u8);

impl DegradationFactor {
    /// Degradation factor `a` (m.s⁻²)
    const A_M_S2: [f64; 16] = [
        0.0, 0.00005, 0.00009, 0.00012, 0.00015, 0.00020, 0.00030, 0.00045, 0.00060, 0.00090,
        0.00150, 0.00210, 0.00270, 0.00330, 0.00460, 0.00580,
    ];

    /// User time-out interval, en route through non precision approach (s)
    const TIMEOUT_NPA_S: [f64; 16] = [
        180.0, 180.0, 153.0, 135.0, 135.0, 117.0, 99.0, 81.0, 63.0, 45.0, 45.0, 27.0, 27.0, 27.0,
        18.0, 18.0,
    ];

    /// User time-out interval, precision approach (s)
    const TIMEOUT_PA_S: [f64; 16] = [
        120.0, 120.0, 102.0, 90.0, 90.0, 78.0, 66.0, 54.0, 42.0, 30.0, 30.0, 18.0, 18.0, 18.0,
        12.0, 12.0,
    ];

    pub(crate) fn from_bits(value: u8) -> Self {
        Self(value & 0x0f)
    }

    /// Indicator value
    pub fn indicator(&self) -> u8 {
        self.0
    }

    /// Degradation factor (m.s⁻²)
    pub fn a_m_s2(&self) -> f64 {
        Self::A_M_S2[self.0 as usize]
    }

    /// Fast correction time-out interval (s) for this [NavigationMode]
    pub fn timeout_s(&self, mode: NavigationMode) -> f64 {
        match mode {
            NavigationMode::PrecisionApproach => Self::TIMEOUT_PA_S[self.0 as usize],
            NavigationMode::NonPrecisionApproach => Self::TIMEOUT_NPA_S[self.0 as usize],
        }
    }
}

/// [FastCorrectionDegradation] (MT7)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FastCorrectionDegradation {
    /// System latency (s)
    pub latency_s: f64,
    /// Issue of data, PRN mask
    pub iodp: u8,
    factors: Vec<DegradationFactor>,
}

impl FastCorrectionDegradation {
    pub(crate) fn decode(cursor: &mut BitCursor) -> Result<Self, Error> {
        let latency_s = cursor.unsigned_scaled(4, 1.0)?;
        let iodp = cursor.unsigned(2)?;
        cursor.skip(2)?;
        let factors = (0..MAX_MASKED_SATELLITES)
            .map(|_| cursor.unsigned(4).map(DegradationFactor::from_bits))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            latency_s,
            iodp,
            factors,
        })
    }

    /// [DegradationFactor] of this (1-based) mask number
    pub fn factor(&self, mask_number: usize) -> Option<DegradationFactor> {
        mask_number
            .checked_sub(1)
            .and_then(|i| self.factors.get(i))
            .copied()
    }
}
