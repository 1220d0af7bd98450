//! Pseudo range error variance budget
use std::sync::Arc;

use crate::{
    cfg::{NavigationMode, ReceiverClass},
    error::Error,
    geometry::{GeodeticPosition, LineOfSight},
    prelude::Epoch,
    provider::DegradationRecord,
};

mod cnmp;
mod flt;
mod tropo;
mod udre;

pub use cnmp::cnmp_variance;
pub use flt::flt_variance;
pub use tropo::tropo_variance;
pub use udre::{udre_variance, Exclusion, Udrei, UdreVariance};

#[cfg(doc)]
use crate::cfg::OverrideRegistry;

/// [VarianceRuntime] describes the conditions a variance term is evaluated in.
/// It is handed to the built-in models and to any override.
#[derive(Debug, Copy, Clone)]
pub struct VarianceRuntime<'a> {
    /// Epoch of observation
    pub t: Epoch,
    /// User position
    pub user: &'a GeodeticPosition,
    /// Line of sight to the satellite
    pub los: &'a LineOfSight,
    /// Receiver accuracy class
    pub class: ReceiverClass,
    /// Ongoing [NavigationMode]
    pub mode: NavigationMode,
}

/// Tropospheric variance override
pub type TropoFn = Arc<dyn Fn(&VarianceRuntime) -> f64 + Send + Sync>;

/// Code noise and multipath variance override
pub type CnmpFn = Arc<dyn Fn(&VarianceRuntime) -> f64 + Send + Sync>;

/// UDRE variance override
pub type UdreFn =
    Arc<dyn Fn(&VarianceRuntime, Udrei, &DegradationRecord) -> UdreVariance + Send + Sync>;

/// FLT variance override, receiving σ²UDRE
pub type FltFn = Arc<dyn Fn(&VarianceRuntime, f64, &DegradationRecord) -> f64 + Send + Sync>;

/// [VarianceModel] holds one optional replacement per variance term.
/// A replacement fully substitutes the built-in model of that term.
/// It is usually resolved from an [OverrideRegistry] at configuration time.
#[derive(Clone, Default)]
pub struct VarianceModel {
    /// Replaces [tropo_variance]
    pub tropo: Option<TropoFn>,
    /// Replaces [cnmp_variance]
    pub cnmp: Option<CnmpFn>,
    /// Replaces [udre_variance]
    pub udre: Option<UdreFn>,
    /// Replaces [flt_variance]
    pub flt: Option<FltFn>,
}

impl std::fmt::Debug for VarianceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = |custom: bool| if custom { "custom" } else { "built-in" };
        f.debug_struct("VarianceModel")
            .field("tropo", &name(self.tropo.is_some()))
            .field("cnmp", &name(self.cnmp.is_some()))
            .field("udre", &name(self.udre.is_some()))
            .field("flt", &name(self.flt.is_some()))
            .finish()
    }
}

fn checked(term: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidVariance { term, value })
    }
}

impl VarianceModel {
    /// Builds a [VarianceModel] with tropospheric override
    pub fn with_tropo<F: Fn(&VarianceRuntime) -> f64 + Send + Sync + 'static>(&self, f: F) -> Self {
        let mut s = self.clone();
        s.tropo = Some(Arc::new(f));
        s
    }

    /// Builds a [VarianceModel] with code noise and multipath override
    pub fn with_cnmp<F: Fn(&VarianceRuntime) -> f64 + Send + Sync + 'static>(&self, f: F) -> Self {
        let mut s = self.clone();
        s.cnmp = Some(Arc::new(f));
        s
    }

    /// Builds a [VarianceModel] with UDRE override
    pub fn with_udre<
        F: Fn(&VarianceRuntime, Udrei, &DegradationRecord) -> UdreVariance + Send + Sync + 'static,
    >(
        &self,
        f: F,
    ) -> Self {
        let mut s = self.clone();
        s.udre = Some(Arc::new(f));
        s
    }

    /// Builds a [VarianceModel] with FLT override
    pub fn with_flt<F: Fn(&VarianceRuntime, f64, &DegradationRecord) -> f64 + Send + Sync + 'static>(
        &self,
        f: F,
    ) -> Self {
        let mut s = self.clone();
        s.flt = Some(Arc::new(f));
        s
    }

    /// σ²tropo (m²)
    pub fn tropo(&self, rtm: &VarianceRuntime) -> Result<f64, Error> {
        let value = match &self.tropo {
            Some(f) => f(rtm),
            None => tropo_variance(rtm),
        };
        checked("tropo", value)
    }

    /// σ²CNMP (m²)
    pub fn cnmp(&self, rtm: &VarianceRuntime) -> Result<f64, Error> {
        let value = match &self.cnmp {
            Some(f) => f(rtm),
            None => cnmp_variance(rtm),
        };
        checked("cnmp", value)
    }

    /// σ²UDRE (m²) or exclusion marker
    pub fn udre(
        &self,
        rtm: &VarianceRuntime,
        udrei: Udrei,
        record: &DegradationRecord,
    ) -> Result<UdreVariance, Error> {
        let value = match &self.udre {
            Some(f) => f(rtm, udrei, record),
            None => udre_variance(rtm, udrei, record),
        };
        match value {
            UdreVariance::Usable(sigma2) => Ok(UdreVariance::Usable(checked("udre", sigma2)?)),
            unusable => Ok(unusable),
        }
    }

    /// σ²FLT (m²)
    pub fn flt(
        &self,
        rtm: &VarianceRuntime,
        sig2_udre: f64,
        record: &DegradationRecord,
    ) -> Result<f64, Error> {
        let value = match &self.flt {
            Some(f) => f(rtm, sig2_udre, record),
            None => flt_variance(rtm, sig2_udre, record),
        };
        checked("flt", value)
    }
}
