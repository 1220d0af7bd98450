use crate::{cfg::ReceiverClass, variance::VarianceRuntime};

/// Airborne multipath: a + b * e^(elev/c)
const MULTIPATH_A_M: f64 = 0.13;
const MULTIPATH_B_M: f64 = 0.53;
const MULTIPATH_C_DEG: f64 = -10.0;

impl ReceiverClass {
    /// Receiver noise and divergence standard deviation (m)
    pub fn sigma_noise_m(&self) -> f64 {
        match self {
            Self::A => 0.36,
            Self::B => 0.15,
        }
    }
}

/// Built-in code noise and multipath model
pub fn cnmp_variance(rtm: &VarianceRuntime) -> f64 {
    let sigma_multipath =
        MULTIPATH_A_M + MULTIPATH_B_M * (rtm.los.elevation_deg / MULTIPATH_C_DEG).exp();
    rtm.class.sigma_noise_m().powi(2) + sigma_multipath.powi(2)
}
