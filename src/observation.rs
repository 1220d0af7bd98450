//! Per satellite observation and its error budget
use log::debug;

use crate::{
    cfg::{NavigationMode, ReceiverClass},
    error::Error,
    geometry::{GeodeticPosition, LineOfSight},
    ipp::PiercePoint,
    prelude::{Epoch, SV},
    protection::ProtectionLevel,
    provider::{IonosphereGrid, MasterStation},
    variance::{Exclusion, UdreVariance, VarianceModel, VarianceRuntime},
};

/// Who performs the observation
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ObservationKind {
    /// Airborne user: complete error budget
    #[default]
    User,
    /// Reference station: corrections are not applied,
    /// so neither UDRE nor FLT terms exist.
    Reference,
}

/// What an [SbasObservation] is built from, besides geometry.
#[derive(Clone, Copy)]
pub struct ObservationContext<'a> {
    /// [VarianceModel], possibly overridden
    pub model: &'a VarianceModel,
    /// Integrity data source
    pub master: &'a dyn MasterStation,
    /// Optional ionospheric grid
    pub grid: Option<&'a dyn IonosphereGrid>,
    /// Receiver accuracy class
    pub class: ReceiverClass,
    /// [NavigationMode]
    pub mode: NavigationMode,
    /// Ionospheric shell height (km)
    pub shell_height_km: f64,
}

impl std::fmt::Debug for ObservationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ObservationContext")
            .field("model", self.model)
            .field("grid", &self.grid.is_some())
            .field("class", &self.class)
            .field("mode", &self.mode)
            .field("shell_height_km", &self.shell_height_km)
            .finish()
    }
}

/// [SbasObservation] of one satellite, by one user, at one epoch.
/// Geometry is borrowed from the [crate::prelude::GeometryProvider].
/// Every variance term is evaluated on construction and cannot be modified.
#[derive(Debug, Clone, PartialEq)]
pub struct SbasObservation<'a> {
    t: Epoch,
    kind: ObservationKind,
    user: &'a GeodeticPosition,
    los: &'a LineOfSight,
    ipp: PiercePoint,
    sig2_tropo: f64,
    sig2_cnmp: f64,
    udre: Option<UdreVariance>,
    sig2_flt: Option<f64>,
    sig2_uire: Option<f64>,
    protection: Option<ProtectionLevel>,
}

impl<'a> SbasObservation<'a> {
    /// Builds a new [SbasObservation], evaluating its pierce point
    /// and every variance term applicable to this [ObservationKind].
    pub fn new(
        t: Epoch,
        kind: ObservationKind,
        user: &'a GeodeticPosition,
        los: &'a LineOfSight,
        ctx: &ObservationContext,
    ) -> Result<Self, Error> {
        los.validate()?;

        let rtm = VarianceRuntime {
            t,
            user,
            los,
            class: ctx.class,
            mode: ctx.mode,
        };

        let ipp = PiercePoint::new(user, los, ctx.shell_height_km);

        let sig2_tropo = ctx.model.tropo(&rtm)?;
        let sig2_cnmp = ctx.model.cnmp(&rtm)?;

        let (udre, sig2_flt) = match kind {
            ObservationKind::Reference => (None, None),
            ObservationKind::User => match ctx.master.udrei(t, los.sv) {
                None => (Some(UdreVariance::Unusable(Exclusion::NoIntegrity)), None),
                Some(udrei) => {
                    let record = ctx.master.degradation(t, los.sv);
                    match ctx.model.udre(&rtm, udrei, &record)? {
                        UdreVariance::Usable(sig2_udre) => {
                            let sig2_flt = ctx.model.flt(&rtm, sig2_udre, &record)?;
                            (Some(UdreVariance::Usable(sig2_udre)), Some(sig2_flt))
                        },
                        unusable => (Some(unusable), None),
                    }
                },
            },
        };

        let sig2_uire = match ctx.grid {
            Some(grid) => match grid.vertical_variance(t, &ipp) {
                Some(sig2_uive) => {
                    let sig2_uire = ipp.obliquity.powi(2) * sig2_uive;
                    if !(sig2_uire.is_finite() && sig2_uire >= 0.0) {
                        return Err(Error::InvalidVariance {
                            term: "uire",
                            value: sig2_uire,
                        });
                    }
                    Some(sig2_uire)
                },
                None => None,
            },
            None => None,
        };

        debug!(
            "{} ({}) - tropo={:.4} cnmp={:.4} udre={:?} flt={:?} uire={:?}",
            t, los.sv, sig2_tropo, sig2_cnmp, udre, sig2_flt, sig2_uire
        );

        Ok(Self {
            t,
            kind,
            user,
            los,
            ipp,
            sig2_tropo,
            sig2_cnmp,
            udre,
            sig2_flt,
            sig2_uire,
            protection: None,
        })
    }

    /// Attaches the epoch [ProtectionLevel]
    pub(crate) fn with_protection(mut self, protection: ProtectionLevel) -> Self {
        self.protection = Some(protection);
        self
    }

    pub fn t(&self) -> Epoch {
        self.t
    }

    pub fn kind(&self) -> ObservationKind {
        self.kind
    }

    pub fn sv(&self) -> SV {
        self.los.sv
    }

    pub fn user(&self) -> &'a GeodeticPosition {
        self.user
    }

    pub fn line_of_sight(&self) -> &'a LineOfSight {
        self.los
    }

    /// Ionospheric [PiercePoint] of this line of sight
    pub fn ipp(&self) -> &PiercePoint {
        &self.ipp
    }

    /// σ²tropo (m²)
    pub fn sig2_tropo(&self) -> f64 {
        self.sig2_tropo
    }

    /// σ²CNMP (m²)
    pub fn sig2_cnmp(&self) -> f64 {
        self.sig2_cnmp
    }

    /// UDRE model outcome, user observations only
    pub fn udre(&self) -> Option<UdreVariance> {
        self.udre
    }

    /// σ²UDRE (m²), user observations of usable satellites only
    pub fn sig2_udre(&self) -> Option<f64> {
        self.udre.and_then(|udre| udre.sigma2_m2())
    }

    /// σ²FLT (m²), user observations of usable satellites only
    pub fn sig2_flt(&self) -> Option<f64> {
        self.sig2_flt
    }

    /// σ²UIRE (m²), when an ionospheric grid covers the pierce point
    pub fn sig2_uire(&self) -> Option<f64> {
        self.sig2_uire
    }

    /// True unless the UDRE model excluded this satellite
    pub fn is_usable(&self) -> bool {
        !self.udre.is_some_and(|udre| udre.is_unusable())
    }

    /// Total pseudo range variance (m²), [None] when not usable.
    pub fn total_variance(&self) -> Option<f64> {
        if !self.is_usable() {
            return None;
        }
        Some(
            self.sig2_tropo
                + self.sig2_cnmp
                + self.sig2_udre().unwrap_or_default()
                + self.sig2_flt.unwrap_or_default()
                + self.sig2_uire.unwrap_or_default(),
        )
    }

    /// Epoch [ProtectionLevel], once resolved
    pub fn protection_level(&self) -> Option<&ProtectionLevel> {
        self.protection.as_ref()
    }

    /// VPL (m), once resolved with sufficient geometry
    pub fn vpl_m(&self) -> Option<f64> {
        self.protection.as_ref().and_then(|pl| pl.vpl_m())
    }

    /// HPL (m), once resolved with sufficient geometry
    pub fn hpl_m(&self) -> Option<f64> {
        self.protection.as_ref().and_then(|pl| pl.hpl_m())
    }
}
