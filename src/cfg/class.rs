use crate::cfg::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Airborne receiver accuracy designator. Selects the receiver noise
/// contribution to the code noise and multipath variance.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReceiverClass {
    /// [ReceiverClass::A]: 0.36 m receiver noise. This is our default, conservative, class.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "a", alias = "AAD-A"))]
    A,

    /// [ReceiverClass::B]: 0.15 m receiver noise
    #[cfg_attr(feature = "serde", serde(alias = "b", alias = "AAD-B"))]
    B,
}

impl std::str::FromStr for ReceiverClass {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        let trimmed = s.trim();
        match trimmed {
            "a" | "aad-a" => Ok(Self::A),
            "b" | "aad-b" => Ok(Self::B),
            _ => Err(Error::InvalidReceiverClass),
        }
    }
}

impl std::fmt::Display for ReceiverClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "AAD-A"),
            Self::B => write!(f, "AAD-B"),
        }
    }
}
