//! Data providers: master station (integrity) and ionospheric grid
use log::debug;

use crate::{
    cfg::NavigationMode,
    ipp::PiercePoint,
    message::{ClockEphemerisCovariance, DegradationFactor, MessageTables, PrnMask},
    prelude::{Epoch, SV},
    variance::Udrei,
};

#[cfg(doc)]
use crate::variance::VarianceModel;

/// Range rate correction aging
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RangeRateAging {
    /// MT10 B_rrc (m)
    pub b_rrc_m: f64,
    /// Interval between the two most recent fast corrections (s)
    pub interval_s: f64,
}

/// Fast correction aging of one satellite
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FastCorrectionAging {
    /// MT7 degradation factor
    pub factor: DegradationFactor,
    /// MT7 system latency (s)
    pub latency_s: f64,
    /// Time elapsed since the fast correction time of applicability (s)
    pub age_s: f64,
    /// Range rate correction aging, when range rate corrections are applied
    pub rrc: Option<RangeRateAging>,
}

/// Long term correction aging of one satellite
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LongTermAging {
    /// Corrections without velocity terms
    VelocityCode0 {
        /// MT10 C_ltc_v0 (m)
        c_ltc_v0_m: f64,
        /// MT10 I_ltc_v0 (s)
        i_ltc_v0_s: f64,
        /// Time elapsed since the long term correction (s)
        age_s: f64,
    },
    /// Corrections with velocity terms
    VelocityCode1 {
        /// MT10 C_ltc_lsb (m)
        c_ltc_lsb_m: f64,
        /// MT10 C_ltc_v1 (m/s)
        c_ltc_v1_m_s: f64,
        /// MT10 I_ltc_v1 (s)
        i_ltc_v1_s: f64,
        /// t - t0, t0 being the long term correction time of applicability (s)
        t_minus_t0_s: f64,
    },
}

/// [DegradationRecord] gathers the broadcast quantities the UDRE
/// and FLT terms of one satellite depend on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DegradationRecord {
    /// MT28 clock-ephemeris covariance, if broadcast
    pub covariance: Option<ClockEphemerisCovariance>,
    /// MT10 C_covariance
    pub c_covariance: f64,
    /// Fast correction aging
    pub fast: Option<FastCorrectionAging>,
    /// Long term correction aging
    pub long_term: Option<LongTermAging>,
    /// MT10 C_er (m)
    pub c_er_m: f64,
    /// True when the en route fallback degradation applies
    pub en_route: bool,
    /// MT10 RSS_UDRE flag
    pub rss_udre: bool,
}

/// [MasterStation] supplies the integrity data of each satellite,
/// consumed by the [VarianceModel]. It is shared by every observation of a batch.
pub trait MasterStation: Sync {
    /// [Udrei] of this satellite at this [Epoch].
    /// [None] when the satellite is not covered by any integrity data.
    fn udrei(&self, t: Epoch, sv: SV) -> Option<Udrei>;

    /// [DegradationRecord] of this satellite at this [Epoch]
    fn degradation(&self, t: Epoch, sv: SV) -> DegradationRecord;
}

/// [IonosphereGrid] interpolates the broadcast grid at a [PiercePoint].
/// It is shared by every observation of a batch.
pub trait IonosphereGrid: Sync {
    /// σ²UIVE (m²) at this [PiercePoint], [None] when not covered.
    fn vertical_variance(&self, t: Epoch, ipp: &PiercePoint) -> Option<f64>;
}

/// [MasterStation] backed by decoded broadcast [MessageTables]
#[derive(Debug, Clone, Copy)]
pub struct BroadcastMasterStation<'a> {
    tables: &'a MessageTables,
    mode: NavigationMode,
}

impl<'a> BroadcastMasterStation<'a> {
    /// Builds a new [BroadcastMasterStation]
    pub fn new(tables: &'a MessageTables, mode: NavigationMode) -> Self {
        Self { tables, mode }
    }

    fn mask(&self) -> Option<&'a PrnMask> {
        self.tables.prn_mask()
    }

    fn aging(&self, t: Epoch, mask: &PrnMask, mask_number: usize) -> Option<FastCorrectionAging> {
        let fc = self
            .tables
            .fast_corrections(mask_number)
            .filter(|fc| fc.iodp == mask.iodp)?;
        let mt7 = self.tables.fc_degradation.get(mask.iodp as usize)?;
        let factor = mt7.factor(mask_number)?;
        let age_s = (t - fc.t).to_seconds().max(0.0);
        // tables keep a single fast correction per slot: no range rate term
        Some(FastCorrectionAging {
            factor,
            latency_s: mt7.latency_s,
            age_s,
            rrc: None,
        })
    }
}

impl MasterStation for BroadcastMasterStation<'_> {
    fn udrei(&self, t: Epoch, sv: SV) -> Option<Udrei> {
        let mask = self.mask()?;
        let mask_number = mask.mask_number(sv)?;

        let fc = self
            .tables
            .fast_corrections(mask_number)
            .filter(|fc| fc.iodp == mask.iodp);

        if let Some(aging) = self.aging(t, mask, mask_number) {
            let timeout_s = aging.factor.timeout_s(self.mode);
            if aging.age_s > timeout_s {
                debug!(
                    "{} ({}) - fast correction timed out ({:.1}s > {:.1}s)",
                    t, sv, aging.age_s, timeout_s
                );
                return None;
            }
        }

        // most recent of MT6 and MT2-5
        let integrity = self.tables.integrity.latest();
        match (fc, integrity) {
            (Some(fc), Some(mt6)) if mt6.t > fc.t => mt6.udrei(mask_number),
            (Some(fc), _) => fc.udrei(mask_number),
            (None, Some(mt6)) => mt6.udrei(mask_number),
            (None, None) => None,
        }
    }

    fn degradation(&self, t: Epoch, sv: SV) -> DegradationRecord {
        let mut record = DegradationRecord::default();

        let mask_number = match self.mask().and_then(|mask| mask.mask_number(sv)) {
            Some(n) => n,
            None => return record,
        };

        record.covariance = self.tables.covariance.get(mask_number).cloned();

        if let Some(mt10) = self.tables.degradation.latest() {
            record.c_covariance = mt10.c_covariance;
            record.c_er_m = mt10.c_er_m;
            record.rss_udre = mt10.rss_udre;
        }

        if let Some(mask) = self.mask() {
            record.fast = self.aging(t, mask, mask_number);
        }

        if let Some(fast) = &record.fast {
            let pa_timeout_s = fast.factor.timeout_s(NavigationMode::PrecisionApproach);
            record.en_route =
                self.mode == NavigationMode::NonPrecisionApproach && fast.age_s > pa_timeout_s;
        }

        record
    }
}
