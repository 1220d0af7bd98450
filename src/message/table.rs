//! Per message type, slot indexed storage
use log::{debug, warn};

use crate::{
    error::Error,
    message::{
        BroadcastMessage, ClockEphemerisCovariance, DegradationParameters, FastCorrectionDegradation,
        FastCorrections, GeoEphemeris, IntegrityInfo, Message, MessageType, PrnMask,
        FAST_CORRECTIONS_PER_MESSAGE, MAX_MASKED_SATELLITES, MAX_SLOT,
    },
};

/// [IndexedTable] stores at most one record per slot, in `[min, N)`.
/// Writing a slot overwrites the previous record, no history is kept.
#[derive(Debug, Clone)]
pub struct IndexedTable<T, const N: usize> {
    mt: MessageType,
    min: usize,
    slots: [Option<T>; N],
    latest: Option<usize>,
}

impl<T, const N: usize> IndexedTable<T, N> {
    /// Builds an empty [IndexedTable] for this message type,
    /// accepting slots in `[min, N)`.
    pub fn new(mt: MessageType, min: usize) -> Self {
        Self {
            mt,
            min,
            slots: std::array::from_fn(|_| None),
            latest: None,
        }
    }

    fn check(&self, slot: usize) -> Result<(), Error> {
        if slot < self.min || slot >= N {
            Err(Error::SlotOutOfRange {
                mt: self.mt,
                index: slot,
                min: self.min,
                max: N,
            })
        } else {
            Ok(())
        }
    }

    /// Stores `record` at `slot`, returns the record it replaced.
    pub fn insert(&mut self, slot: usize, record: T) -> Result<Option<T>, Error> {
        self.check(slot)?;
        self.latest = Some(slot);
        Ok(self.slots[slot].replace(record))
    }

    /// Record stored at `slot`
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Most recently written record
    pub fn latest(&self) -> Option<&T> {
        self.latest.and_then(|slot| self.get(slot))
    }

    /// Slot most recently written
    pub fn latest_slot(&self) -> Option<usize> {
        self.latest
    }

    /// Iterates (slot, record) over populated slots
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| s.as_ref().map(|record| (slot, record)))
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True when no slot is populated
    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    /// Table capacity
    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Number of IODP / IODF values
const ISSUES: usize = 4;

/// MT28 slots: mask numbers 1..=51
const COVARIANCE_SLOTS: usize = MAX_MASKED_SATELLITES + 1;

/// MT39 slots: slot numbers 1..=39
const GEO_SLOTS: usize = MAX_SLOT + 1;

/// [MessageTables] gathers the [IndexedTable] of each supported message type.
/// Tables are written by [MessageTables::decode] and shared by reference
/// once decoding of an epoch has completed.
#[derive(Debug, Clone)]
pub struct MessageTables {
    /// MT1 by IODP
    pub prn_mask: IndexedTable<PrnMask, ISSUES>,
    /// MT2 to MT5, each by IODF
    pub fast_corrections: [IndexedTable<FastCorrections, ISSUES>; 4],
    /// MT6
    pub integrity: IndexedTable<IntegrityInfo, 1>,
    /// MT7 by IODP
    pub fc_degradation: IndexedTable<FastCorrectionDegradation, ISSUES>,
    /// MT10
    pub degradation: IndexedTable<DegradationParameters, 1>,
    /// MT28 by PRN mask number
    pub covariance: IndexedTable<ClockEphemerisCovariance, COVARIANCE_SLOTS>,
    /// MT39 by slot number
    pub geo_ephemeris: IndexedTable<GeoEphemeris, GEO_SLOTS>,
}

impl Default for MessageTables {
    fn default() -> Self {
        Self {
            prn_mask: IndexedTable::new(1, 0),
            fast_corrections: [
                IndexedTable::new(2, 0),
                IndexedTable::new(3, 0),
                IndexedTable::new(4, 0),
                IndexedTable::new(5, 0),
            ],
            integrity: IndexedTable::new(6, 0),
            fc_degradation: IndexedTable::new(7, 0),
            degradation: IndexedTable::new(10, 0),
            covariance: IndexedTable::new(28, 1),
            geo_ephemeris: IndexedTable::new(39, 1),
        }
    }
}

impl MessageTables {
    /// Decodes a [BroadcastMessage] and stores the resulting record.
    /// On error, the message is discarded and the tables are left untouched.
    pub fn decode(&mut self, msg: &BroadcastMessage) -> Result<MessageType, Error> {
        let decoded = Message::decode(msg).inspect_err(|e| {
            warn!("{} - discarded broadcast message: {}", msg.received, e);
        })?;
        let mt = decoded.message_type();
        self.store(decoded)?;
        debug!("{} - MT{} stored", msg.received, mt);
        Ok(mt)
    }

    /// Decodes and stores a batch of messages, in order.
    /// Failures are logged and skipped. Returns the number of stored messages.
    pub fn ingest<'a, I: IntoIterator<Item = &'a BroadcastMessage>>(&mut self, messages: I) -> usize {
        messages
            .into_iter()
            .filter(|msg| self.decode(msg).is_ok())
            .count()
    }

    /// Stores a decoded [Message]: the slot of each record
    /// is validated before anything gets written.
    pub fn store(&mut self, message: Message) -> Result<(), Error> {
        match message {
            Message::PrnMask(mask) => {
                self.prn_mask.insert(mask.iodp as usize, mask)?;
            },
            Message::FastCorrections(fc) => {
                let table = (fc.mt as usize)
                    .checked_sub(2)
                    .and_then(|i| self.fast_corrections.get_mut(i))
                    .ok_or(Error::UnsupportedMessageType(fc.mt))?;
                table.insert(fc.iodf as usize, fc)?;
            },
            Message::IntegrityInfo(info) => {
                self.integrity.insert(0, info)?;
            },
            Message::FastCorrectionDegradation(fcd) => {
                self.fc_degradation.insert(fcd.iodp as usize, fcd)?;
            },
            Message::DegradationParameters(params) => {
                self.degradation.insert(0, params)?;
            },
            Message::ClockEphemerisCovariance(cov) => {
                for entry in cov.entries.iter() {
                    self.covariance.check(entry.mask_number)?;
                }
                for entry in cov.entries {
                    self.covariance.insert(entry.mask_number, entry)?;
                }
            },
            Message::GeoEphemeris(eph) => {
                self.geo_ephemeris.insert(eph.slot, eph)?;
            },
        }
        Ok(())
    }

    /// Current [PrnMask]
    pub fn prn_mask(&self) -> Option<&PrnMask> {
        self.prn_mask.latest()
    }

    /// Most recent [FastCorrections] covering this (1-based) mask number
    pub fn fast_corrections(&self, mask_number: usize) -> Option<&FastCorrections> {
        if mask_number == 0 || mask_number > MAX_MASKED_SATELLITES {
            return None;
        }
        let index = (mask_number - 1) / FAST_CORRECTIONS_PER_MESSAGE;
        self.fast_corrections.get(index)?.latest()
    }
}
