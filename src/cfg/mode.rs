use crate::cfg::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Navigation mode, which selects the horizontal confidence multiplier
/// and the fast correction time-out intervals.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavigationMode {
    /// Precision approach (LPV, APV). Both VPL and HPL are relevant.
    #[default]
    PrecisionApproach,

    /// En route through non precision approach. Only HPL is relevant,
    /// with a larger multiplier.
    NonPrecisionApproach,
}

impl std::fmt::Display for NavigationMode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::PrecisionApproach => write!(fmt, "PA"),
            Self::NonPrecisionApproach => write!(fmt, "NPA"),
        }
    }
}

impl std::str::FromStr for NavigationMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pa" | "precision" => Ok(Self::PrecisionApproach),
            "npa" | "non-precision" | "en-route" => Ok(Self::NonPrecisionApproach),
            _ => Err(Error::UnknownNavigationMode),
        }
    }
}
