//! Epoch solutions
use crate::{
    observation::{ObservationKind, SbasObservation},
    prelude::{Epoch, SV},
    protection::ProtectionLevel,
};

/// Integrity solution of one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSolution<'a> {
    /// Epoch of observation
    pub t: Epoch,
    /// Whether this is a user or reference station solution
    pub kind: ObservationKind,
    /// Observations, each carrying the epoch [ProtectionLevel]
    pub observations: Vec<SbasObservation<'a>>,
    /// [ProtectionLevel] of this epoch
    pub protection: ProtectionLevel,
    /// Availability against the configured alert limits, if any.
    pub available: Option<bool>,
}

impl EpochSolution<'_> {
    /// Satellites that contributed to the protection levels
    pub fn used_satellites(&self) -> Vec<SV> {
        self.observations
            .iter()
            .filter(|obs| obs.is_usable())
            .map(|obs| obs.sv())
            .collect()
    }

    /// Satellites excluded by their integrity status
    pub fn excluded_satellites(&self) -> Vec<SV> {
        self.observations
            .iter()
            .filter(|obs| !obs.is_usable())
            .map(|obs| obs.sv())
            .collect()
    }

    /// VPL (m)
    pub fn vpl_m(&self) -> Option<f64> {
        self.protection.vpl_m()
    }

    /// HPL (m)
    pub fn hpl_m(&self) -> Option<f64> {
        self.protection.hpl_m()
    }
}
