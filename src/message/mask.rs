//! MT1: PRN mask
use crate::{
    error::Error,
    message::bits::BitCursor,
    prelude::{Constellation, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of PRN bits in the mask
const MASK_BITS: usize = 210;

/// Maximal number of satellites a mask may designate
pub const MAX_MASKED_SATELLITES: usize = 51;

/// Converts a broadcast PRN number to [SV].
/// GPS: 1..=37, Glonass: 38..=61 (slot + 37), SBAS: 120..=158.
/// SBAS vehicles follow the RINEX convention (PRN - 100).
pub fn prn_to_sv(prn: u8) -> Option<SV> {
    match prn {
        1..=37 => Some(SV::new(Constellation::GPS, prn)),
        38..=61 => Some(SV::new(Constellation::Glonass, prn - 37)),
        120..=158 => Some(SV::new(Constellation::SBAS, prn - 100)),
        _ => None,
    }
}

/// Converts [SV] to its broadcast PRN number, see [prn_to_sv].
pub fn sv_to_prn(sv: SV) -> Option<u8> {
    match sv.constellation {
        Constellation::GPS if (1..=37).contains(&sv.prn) => Some(sv.prn),
        Constellation::Glonass if (1..=24).contains(&sv.prn) => Some(sv.prn + 37),
        c if c.is_sbas() && (20..=58).contains(&sv.prn) => Some(sv.prn + 100),
        _ => None,
    }
}

/// [PrnMask] (MT1) designates which satellites the corrections apply to.
/// Mask numbers are 1-based and follow ascending PRN order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrnMask {
    /// Issue of data, PRN mask
    pub iodp: u8,
    /// Designated PRN numbers, ascending
    prns: Vec<u8>,
}

impl PrnMask {
    pub(crate) fn decode(cursor: &mut BitCursor) -> Result<Self, Error> {
        let mut prns = Vec::with_capacity(MAX_MASKED_SATELLITES);
        for i in 0..MASK_BITS {
            if cursor.flag()? {
                prns.push((i + 1) as u8);
            }
        }
        if prns.len() > MAX_MASKED_SATELLITES {
            return Err(Error::PrnMaskOverflow(prns.len()));
        }
        let iodp = cursor.unsigned(2)?;
        Ok(Self { iodp, prns })
    }

    /// Designated PRNs, in mask order
    pub fn prns(&self) -> &[u8] {
        &self.prns
    }

    /// Number of designated satellites
    pub fn len(&self) -> usize {
        self.prns.len()
    }

    /// True when no satellite is designated
    pub fn is_empty(&self) -> bool {
        self.prns.is_empty()
    }

    /// PRN designated by this (1-based) mask number
    pub fn prn(&self, mask_number: usize) -> Option<u8> {
        mask_number
            .checked_sub(1)
            .and_then(|i| self.prns.get(i))
            .copied()
    }

    /// [SV] designated by this (1-based) mask number
    pub fn sv(&self, mask_number: usize) -> Option<SV> {
        self.prn(mask_number).and_then(prn_to_sv)
    }

    /// Mask number (1-based) of this [SV], if designated
    pub fn mask_number(&self, sv: SV) -> Option<usize> {
        let prn = sv_to_prn(sv)?;
        self.prns.iter().position(|p| *p == prn).map(|i| i + 1)
    }
}
