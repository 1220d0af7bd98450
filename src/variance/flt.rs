use log::debug;

use crate::{
    cfg::NavigationMode,
    provider::{DegradationRecord, FastCorrectionAging, LongTermAging},
    variance::VarianceRuntime,
};

impl FastCorrectionAging {
    /// Fast correction degradation ε_fc (m)
    pub fn epsilon_fc_m(&self) -> f64 {
        let dt = self.age_s + self.latency_s;
        self.factor.a_m_s2() * dt.powi(2) / 2.0
    }

    /// Range rate correction degradation ε_rrc (m)
    pub fn epsilon_rrc_m(&self, mode: NavigationMode) -> f64 {
        match self.rrc {
            Some(rrc) if rrc.interval_s > 0.0 => {
                let i_fc = self.factor.timeout_s(mode);
                (self.factor.a_m_s2() * i_fc / 4.0 + rrc.b_rrc_m / rrc.interval_s) * self.age_s
            },
            _ => 0.0,
        }
    }
}

impl LongTermAging {
    /// Long term correction degradation ε_ltc (m)
    pub fn epsilon_ltc_m(&self) -> f64 {
        match *self {
            Self::VelocityCode0 {
                c_ltc_v0_m,
                i_ltc_v0_s,
                age_s,
            } => {
                if i_ltc_v0_s > 0.0 {
                    c_ltc_v0_m * (age_s / i_ltc_v0_s).floor()
                } else {
                    0.0
                }
            },
            Self::VelocityCode1 {
                c_ltc_lsb_m,
                c_ltc_v1_m_s,
                i_ltc_v1_s,
                t_minus_t0_s,
            } => {
                let outside = (-t_minus_t0_s).max(t_minus_t0_s - i_ltc_v1_s).max(0.0);
                c_ltc_lsb_m + c_ltc_v1_m_s * outside
            },
        }
    }
}

/// Built-in FLT model. Returns the inflation on top of `sig2_udre`,
/// so that σ²UDRE + σ²FLT bounds the residual correction error:
/// - RSS: ε_fc² + ε_rrc² + ε_ltc² + ε_er²
/// - linear: (σUDRE + Σε)² - σ²UDRE
pub fn flt_variance(rtm: &VarianceRuntime, sig2_udre: f64, record: &DegradationRecord) -> f64 {
    let sigma_udre = sig2_udre.max(0.0).sqrt();

    let (eps_fc, eps_rrc) = match &record.fast {
        Some(fast) => (fast.epsilon_fc_m(), fast.epsilon_rrc_m(rtm.mode)),
        None => (0.0, 0.0),
    };

    let eps_ltc = record
        .long_term
        .as_ref()
        .map(|ltc| ltc.epsilon_ltc_m())
        .unwrap_or_default();

    let eps_er = if record.en_route { record.c_er_m } else { 0.0 };

    debug!(
        "{} ({}) - ε_fc={:.3} ε_rrc={:.3} ε_ltc={:.3} ε_er={:.3}",
        rtm.t, rtm.los.sv, eps_fc, eps_rrc, eps_ltc, eps_er
    );

    let terms = [eps_fc, eps_rrc, eps_ltc, eps_er].map(|eps| eps.max(0.0));

    if record.rss_udre {
        terms.iter().map(|eps| eps.powi(2)).sum()
    } else {
        let sum: f64 = terms.iter().sum();
        sum.powi(2) + 2.0 * sigma_udre * sum
    }
}
