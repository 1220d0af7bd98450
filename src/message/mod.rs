//! SBAS broadcast message decoding
use log::debug;

use crate::{error::Error, prelude::Epoch};

pub(crate) mod bits;

mod covariance;
mod degradation;
mod fast;
mod geo;
mod mask;
mod table;

pub use covariance::{ClockEphemerisCovariance, CovarianceMessage};
pub use degradation::DegradationParameters;
pub use fast::{
    DegradationFactor, FastCorrectionDegradation, FastCorrections, IntegrityInfo,
    FAST_CORRECTIONS_PER_MESSAGE,
};
pub use geo::{GeoEphemeris, MAX_SLOT};
pub use mask::{prn_to_sv, sv_to_prn, PrnMask, MAX_MASKED_SATELLITES};
pub use table::{IndexedTable, MessageTables};

use bits::BitCursor;

/// Broadcast message type identifier (1..=63)
pub type MessageType = u8;

/// Broadcast block length, in bits
pub const MESSAGE_BITS: usize = 250;

/// Broadcast block length, in bytes (6 trailing bits unused)
pub const MESSAGE_BYTES: usize = 32;

/// Width of the message type field
pub const MESSAGE_TYPE_BITS: usize = 8;

/// End of the message type specific payload
pub const PAYLOAD_END: usize = 224;

/// [BroadcastMessage] is one received 250 bit block.
/// Bit 0 is the MSB of the first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage {
    /// Reception time
    pub received: Epoch,
    bytes: [u8; MESSAGE_BYTES],
}

impl BroadcastMessage {
    /// Builds a [BroadcastMessage] from a packed, MSB first buffer.
    /// The buffer must be exactly [MESSAGE_BYTES] long; the 6 trailing bits
    /// are ignored.
    pub fn from_bytes(bytes: &[u8], received: Epoch) -> Result<Self, Error> {
        let block: [u8; MESSAGE_BYTES] = bytes
            .try_into()
            .map_err(|_| Error::MalformedLength(bytes.len() * 8))?;
        let mut bytes = block;
        bytes[MESSAGE_BYTES - 1] &= 0xc0;
        Ok(Self { received, bytes })
    }

    /// Builds a [BroadcastMessage] from exactly [MESSAGE_BITS] bits.
    pub fn from_bits(bits: &[bool], received: Epoch) -> Result<Self, Error> {
        if bits.len() != MESSAGE_BITS {
            return Err(Error::MalformedLength(bits.len()));
        }
        let mut bytes = [0_u8; MESSAGE_BYTES];
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        Ok(Self { received, bytes })
    }

    /// Packed content
    pub fn bytes(&self) -> &[u8; MESSAGE_BYTES] {
        &self.bytes
    }

    /// Message type field
    pub fn message_type(&self) -> MessageType {
        self.bytes[0]
    }

    fn payload(&self) -> BitCursor<'_> {
        BitCursor::new(&self.bytes, PAYLOAD_END, MESSAGE_TYPE_BITS)
    }
}

/// Decoded [BroadcastMessage], one variant per supported message type.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// MT1
    PrnMask(PrnMask),
    /// MT2 to MT5
    FastCorrections(FastCorrections),
    /// MT6
    IntegrityInfo(IntegrityInfo),
    /// MT7
    FastCorrectionDegradation(FastCorrectionDegradation),
    /// MT10
    DegradationParameters(DegradationParameters),
    /// MT28
    ClockEphemerisCovariance(CovarianceMessage),
    /// MT39
    GeoEphemeris(GeoEphemeris),
}

impl Message {
    /// Decodes this [BroadcastMessage]. Bit exact and reproducible:
    /// decoding the same block twice yields the same [Message].
    pub fn decode(msg: &BroadcastMessage) -> Result<Self, Error> {
        let mt = msg.message_type();
        let mut cursor = msg.payload();
        let t = msg.received;

        let decoded = match mt {
            1 => Self::PrnMask(PrnMask::decode(&mut cursor)?),
            2..=5 => Self::FastCorrections(FastCorrections::decode(mt, t, &mut cursor)?),
            6 => Self::IntegrityInfo(IntegrityInfo::decode(t, &mut cursor)?),
            7 => Self::FastCorrectionDegradation(FastCorrectionDegradation::decode(&mut cursor)?),
            10 => Self::DegradationParameters(DegradationParameters::decode(&mut cursor)?),
            28 => Self::ClockEphemerisCovariance(CovarianceMessage::decode(&mut cursor)?),
            39 => Self::GeoEphemeris(GeoEphemeris::decode(&mut cursor)?),
            mt => return Err(Error::UnsupportedMessageType(mt)),
        };

        debug!("{} - decoded MT{}: {:?}", t, mt, decoded);
        Ok(decoded)
    }

    /// [MessageType] of this [Message]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::PrnMask(_) => 1,
            Self::FastCorrections(fc) => fc.mt,
            Self::IntegrityInfo(_) => 6,
            Self::FastCorrectionDegradation(_) => 7,
            Self::DegradationParameters(_) => 10,
            Self::ClockEphemerisCovariance(_) => 28,
            Self::GeoEphemeris(_) => 39,
        }
    }
}
