use thiserror::Error;

use crate::prelude::{Epoch, MessageType, SV};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Broadcast blocks are always [crate::message::MESSAGE_BITS] long.
    #[error("malformed message: expecting 250 bits, got {0}")]
    MalformedLength(usize),

    /// Message type field does not match any supported decoder.
    #[error("unsupported message type {0}")]
    UnsupportedMessageType(u8),

    /// Slot (or issue of data) index is outside the table range of this message type.
    #[error("MT{mt}: slot index {index} out of range [{min}, {max})")]
    SlotOutOfRange {
        mt: MessageType,
        index: usize,
        min: usize,
        max: usize,
    },

    /// A PRN mask may designate 51 satellites at most.
    #[error("PRN mask designates {0} satellites (51 max)")]
    PrnMaskOverflow(usize),

    /// Requested bit range does not fit in the message payload.
    #[error("bit range [{offset}, {offset}+{width}) overflows message")]
    BitRange { offset: usize, width: usize },

    /// Line of sight is not a unit vector, or angles are physically invalid.
    #[error("invalid line of sight geometry for {0}")]
    InvalidGeometry(SV),

    /// A variance model (built-in or override) returned a negative or non finite value.
    #[error("{term} variance model returned invalid value {value}")]
    InvalidVariance { term: &'static str, value: f64 },

    /// Observations of a single epoch must share the same user and epoch.
    #[error("inconsistent observation set at {0}")]
    InconsistentEpoch(Epoch),

    /// Geometry provider has nothing for this epoch.
    #[error("no geometry available at {0}")]
    MissingGeometry(Epoch),

    /// Degenerate geometry: the weighted normal matrix cannot be inverted.
    #[error("failed to invert matrix")]
    MatrixInversion,
}
