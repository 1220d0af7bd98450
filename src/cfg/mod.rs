use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{IONO_SHELL_HEIGHT_KM, K_H_NPA, K_H_PA, K_V},
    protection::AlertLimits,
    variance::VarianceModel,
};

mod class;
mod mode;
mod overrides;

pub use class::ReceiverClass;
pub use mode::NavigationMode;
pub use overrides::{Override, OverrideConfig, OverrideRegistry, Term};

/// Configuration Error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown override \"{0}\"")]
    UnknownOverride(String),
    #[error("override \"{name}\" is a {found} function, {expected} expected")]
    OverrideTerm {
        name: String,
        expected: Term,
        found: Term,
    },
    #[error("invalid receiver class")]
    InvalidReceiverClass,
    #[error("unknown navigation mode")]
    UnknownNavigationMode,
    #[error("invalid confidence multiplier: {0}")]
    InvalidMultiplier(f64),
    #[error("invalid shell height: {0} km")]
    InvalidShellHeight(f64),
}

fn default_shell_height_km() -> f64 {
    IONO_SHELL_HEIGHT_KM
}

fn default_k_v() -> f64 {
    K_V
}

fn default_k_h_pa() -> f64 {
    K_H_PA
}

fn default_k_h_npa() -> f64 {
    K_H_NPA
}

fn default_min_elevation_deg() -> f64 {
    5.0
}

/// Integrity processing configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Airborne receiver accuracy designator
    #[cfg_attr(feature = "serde", serde(default))]
    pub class: ReceiverClass,
    /// [NavigationMode], selecting the horizontal multiplier
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: NavigationMode,
    /// Ionospheric shell height (km)
    #[cfg_attr(feature = "serde", serde(default = "default_shell_height_km"))]
    pub shell_height_km: f64,
    /// Vertical confidence multiplier
    #[cfg_attr(feature = "serde", serde(default = "default_k_v"))]
    pub k_v: f64,
    /// Horizontal confidence multiplier in precision approach
    #[cfg_attr(feature = "serde", serde(default = "default_k_h_pa"))]
    pub k_h_pa: f64,
    /// Horizontal confidence multiplier in non precision approach
    #[cfg_attr(feature = "serde", serde(default = "default_k_h_npa"))]
    pub k_h_npa: f64,
    /// Satellites below this elevation (degrees) are not used
    #[cfg_attr(feature = "serde", serde(default = "default_min_elevation_deg"))]
    pub min_elevation_deg: f64,
    /// Variance overrides, by registered name
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: OverrideConfig,
    /// Alert limits the protection levels are checked against
    #[cfg_attr(feature = "serde", serde(default))]
    pub alert_limits: Option<AlertLimits>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class: ReceiverClass::default(),
            mode: NavigationMode::default(),
            shell_height_km: default_shell_height_km(),
            k_v: default_k_v(),
            k_h_pa: default_k_h_pa(),
            k_h_npa: default_k_h_npa(),
            min_elevation_deg: default_min_elevation_deg(),
            overrides: OverrideConfig::default(),
            alert_limits: None,
        }
    }
}

impl Config {
    /// Returns new [Config] with updated [ReceiverClass]
    pub fn with_receiver_class(&self, class: ReceiverClass) -> Self {
        let mut s = self.clone();
        s.class = class;
        s
    }

    /// Returns new [Config] with updated [NavigationMode]
    pub fn with_navigation_mode(&self, mode: NavigationMode) -> Self {
        let mut s = self.clone();
        s.mode = mode;
        s
    }

    /// Returns new [Config] with updated ionospheric shell height (km)
    pub fn with_shell_height_km(&self, height_km: f64) -> Self {
        let mut s = self.clone();
        s.shell_height_km = height_km;
        s
    }

    /// Returns new [Config] with updated elevation mask (degrees)
    pub fn with_min_elevation_deg(&self, elevation_deg: f64) -> Self {
        let mut s = self.clone();
        s.min_elevation_deg = elevation_deg;
        s
    }

    /// Returns new [Config] with these [OverrideConfig]
    pub fn with_overrides(&self, overrides: OverrideConfig) -> Self {
        let mut s = self.clone();
        s.overrides = overrides;
        s
    }

    /// Returns new [Config] with these [AlertLimits]
    pub fn with_alert_limits(&self, limits: AlertLimits) -> Self {
        let mut s = self.clone();
        s.alert_limits = Some(limits);
        s
    }

    /// Horizontal multiplier of the current [NavigationMode]
    pub fn k_h(&self) -> f64 {
        match self.mode {
            NavigationMode::PrecisionApproach => self.k_h_pa,
            NavigationMode::NonPrecisionApproach => self.k_h_npa,
        }
    }

    /// Verifies numerical settings
    pub fn validate(&self) -> Result<(), Error> {
        for k in [self.k_v, self.k_h_pa, self.k_h_npa] {
            if !(k.is_finite() && k > 0.0) {
                return Err(Error::InvalidMultiplier(k));
            }
        }
        if !(self.shell_height_km.is_finite() && self.shell_height_km > 0.0) {
            return Err(Error::InvalidShellHeight(self.shell_height_km));
        }
        Ok(())
    }

    /// Builds the [VarianceModel] from the named overrides
    pub fn variance_model(&self, registry: &OverrideRegistry) -> Result<VarianceModel, Error> {
        self.overrides.resolve(registry)
    }
}
