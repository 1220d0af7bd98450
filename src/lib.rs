#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod constants;
mod error;
mod geometry;
mod ipp;
mod message;
mod observation;
mod protection;
mod provider;
mod solutions;
mod solver;
mod variance;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{
        Config, Error as ConfigError, NavigationMode, Override, OverrideConfig, OverrideRegistry,
        ReceiverClass, Term,
    };
    pub use crate::constants::{IONO_SHELL_HEIGHT_KM, K_H_NPA, K_H_PA, K_V};
    pub use crate::geometry::{EpochGeometry, GeodeticPosition, GeometryProvider, LineOfSight};
    pub use crate::ipp::PiercePoint;
    pub use crate::message::{
        prn_to_sv, sv_to_prn, BroadcastMessage, ClockEphemerisCovariance, CovarianceMessage,
        DegradationFactor, DegradationParameters, FastCorrectionDegradation, FastCorrections,
        GeoEphemeris, IndexedTable, IntegrityInfo, Message, MessageTables, MessageType, PrnMask,
        MESSAGE_BITS, MESSAGE_BYTES,
    };
    pub use crate::observation::{ObservationContext, ObservationKind, SbasObservation};
    pub use crate::protection::{AlertLimits, ProtectionLevel, ProtectionLevelEngine};
    pub use crate::provider::{
        BroadcastMasterStation, DegradationRecord, FastCorrectionAging, IonosphereGrid,
        LongTermAging, MasterStation, RangeRateAging,
    };
    pub use crate::solutions::EpochSolution;
    pub use crate::solver::Solver;
    pub use crate::variance::{
        cnmp_variance, flt_variance, tropo_variance, udre_variance, CnmpFn, Exclusion, FltFn,
        TropoFn, UdreFn, UdreVariance, Udrei, VarianceModel, VarianceRuntime,
    };
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
