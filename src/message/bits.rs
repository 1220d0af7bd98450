//! Bit level extraction
use num_traits::NumCast;

use crate::error::Error;

/// Sequential, MSB first, reader over a broadcast block.
/// Every read advances the cursor by the field width.
#[derive(Debug, Clone)]
pub(crate) struct BitCursor<'a> {
    bytes: &'a [u8],
    len: usize,
    pos: usize,
}

impl<'a> BitCursor<'a> {
    /// Builds a [BitCursor] over the first `len` bits of `bytes`,
    /// starting at bit `pos`.
    pub fn new(bytes: &'a [u8], len: usize, pos: usize) -> Self {
        debug_assert!(len <= bytes.len() * 8);
        Self { bytes, len, pos }
    }

    /// Current position, in bits from start of block
    pub fn position(&self) -> usize {
        self.pos
    }

    fn raw(&mut self, width: usize) -> Result<u64, Error> {
        if width == 0 || width > 64 || self.pos + width > self.len {
            return Err(Error::BitRange {
                offset: self.pos,
                width,
            });
        }
        let mut value = 0_u64;
        for bit in self.pos..self.pos + width {
            let byte = self.bytes[bit / 8];
            let set = (byte >> (7 - (bit % 8))) & 0x01;
            value = (value << 1) | set as u64;
        }
        self.pos += width;
        Ok(value)
    }

    /// Skips `width` bits (spare or reserved fields)
    pub fn skip(&mut self, width: usize) -> Result<(), Error> {
        if self.pos + width > self.len {
            return Err(Error::BitRange {
                offset: self.pos,
                width,
            });
        }
        self.pos += width;
        Ok(())
    }

    /// Reads one bit as a flag
    pub fn flag(&mut self) -> Result<bool, Error> {
        Ok(self.raw(1)? == 1)
    }

    /// Reads an unsigned integer field
    pub fn unsigned<T: NumCast>(&mut self, width: usize) -> Result<T, Error> {
        let offset = self.pos;
        let raw = self.raw(width)?;
        <T as NumCast>::from(raw).ok_or(Error::BitRange { offset, width })
    }

    /// Reads a two's complement field
    pub fn signed(&mut self, width: usize) -> Result<i64, Error> {
        let raw = self.raw(width)?;
        Ok(sign_extend(raw, width))
    }

    /// Reads an unsigned field and applies the scale factor
    pub fn unsigned_scaled(&mut self, width: usize, scale: f64) -> Result<f64, Error> {
        let raw: u64 = self.unsigned(width)?;
        Ok(raw as f64 * scale)
    }

    /// Reads a two's complement field and applies the scale factor
    pub fn signed_scaled(&mut self, width: usize, scale: f64) -> Result<f64, Error> {
        Ok(self.signed(width)? as f64 * scale)
    }
}

/// Interprets the `width` LSB of `raw` as a two's complement integer.
pub(crate) fn sign_extend(raw: u64, width: usize) -> i64 {
    if width >= 64 {
        return raw as i64;
    }
    let sign = 1_u64 << (width - 1);
    if raw & sign == 0 {
        raw as i64
    } else {
        (raw as i64) - (1_i64 << width)
    }
}

#[cfg(test)]
mod test {
    use super::{sign_extend, BitCursor};

    #[test]
    fn twos_complement() {
        assert_eq!(sign_extend(0b0111, 4), 7);
        assert_eq!(sign_extend(0b1000, 4), -8);
        assert_eq!(sign_extend(0b1111, 4), -1);
        assert_eq!(sign_extend(0x3_FFFF_FFFF, 34), -1);
        assert_eq!(sign_extend(0x1_FFFF_FFFF, 34), 0x1_FFFF_FFFF);
    }

    #[test]
    fn msb_first_cursor() {
        let bytes = [0b1010_0000, 0xff];
        let mut cursor = BitCursor::new(&bytes, 16, 0);
        assert!(cursor.flag().unwrap());
        assert_eq!(cursor.unsigned::<u8>(3).unwrap(), 0b010);
        assert_eq!(cursor.signed(8).unwrap(), 0b0000_1111);
        assert_eq!(cursor.position(), 12);
        assert_eq!(cursor.signed(4).unwrap(), -1);
        assert!(cursor.flag().is_err());
    }
}
