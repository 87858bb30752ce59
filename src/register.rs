//! The encoder's low-bound register and bit queue.
//!
//! `low` is a 32-bit window onto the lower bound of the coding interval and
//! `range` its width. Renormalization moves the top bit of `low` into a
//! small bit queue; every 8 queued bits form one byte for the
//! [`ByteEmitter`](crate::emitter::ByteEmitter). Additions to `low` are done
//! in 64-bit so that an overflow of the window is seen as a carry, which is
//! added to the queued bits and, if those overflow too, travels with the
//! byte being assembled.

use crate::error::{Error, Result};

/// Width of the `low` and `range` registers.
pub const REGISTER_BITS: u32 = 32;

/// Renormalization threshold: `range` is kept at or above this.
pub const TOP: u32 = 1 << (REGISTER_BITS - 1);

/// Precision of bit probabilities (`p1` is scaled by `2^PROB_BITS`).
pub const PROB_BITS: u32 = 16;

const BYTE_BITS: u32 = u8::BITS;

/// Width of the lower sub-interval, assigned to bit 1.
///
/// `p1` is the probability of a 1 bit scaled by `2^16`; zero is clamped to
/// one so neither sub-interval is ever empty.
#[inline]
pub fn split(range: u32, p1: u16) -> u32 {
    let p = u64::from(p1.max(1));
    ((u64::from(range) * p) >> PROB_BITS) as u32
}

/// Complete a partial byte.
///
/// The low `pending_count` bits of `pending_bits` become the high bits of the
/// byte; the remaining `8 - pending_count` bits are the top of `window`.
#[inline]
pub fn flush_byte(pending_bits: u32, pending_count: u32, window: u32) -> u8 {
    debug_assert!(pending_count < BYTE_BITS);
    let queued = pending_bits & ((1 << pending_count) - 1);
    let flush_bits = (window >> (REGISTER_BITS - BYTE_BITS)) >> pending_count;
    ((queued << (BYTE_BITS - pending_count)) | flush_bits) as u8
}

/// Encoder-side register state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoderRegister {
    low: u32,
    range: u32,
    pending_bits: u32,
    pending_count: u32,
    carry: bool,
}

impl CoderRegister {
    /// Fresh register covering the whole interval.
    pub fn new() -> Self {
        Self {
            low: 0,
            range: u32::MAX,
            pending_bits: 0,
            pending_count: 0,
            carry: false,
        }
    }

    /// Build a register from explicit parts.
    ///
    /// Only the low `pending_count` bits of `pending_bits` are kept.
    ///
    /// # Errors
    /// Returns `Error::InvalidRegister` if `pending_count` is not below 8 or
    /// `range` is not normalized.
    pub fn from_parts(low: u32, range: u32, pending_bits: u32, pending_count: u32) -> Result<Self> {
        if pending_count >= BYTE_BITS {
            return Err(Error::InvalidRegister("pending_count must be below 8"));
        }
        if range < TOP {
            return Err(Error::InvalidRegister("range must be at least 2^31"));
        }
        Ok(Self {
            low,
            range,
            pending_bits: pending_bits & ((1 << pending_count) - 1),
            pending_count,
            carry: false,
        })
    }

    /// Lower bound window.
    pub fn low(&self) -> u32 {
        self.low
    }

    /// Interval width.
    pub fn range(&self) -> u32 {
        self.range
    }

    /// Bits queued towards the next byte.
    pub fn pending_bits(&self) -> u32 {
        self.pending_bits
    }

    /// Number of queued bits, always below 8.
    pub fn pending_count(&self) -> u32 {
        self.pending_count
    }

    /// Narrow the interval to `[low + low_update, low + low_update + range)`
    /// and renormalize.
    ///
    /// Every byte completed during renormalization is passed to `emit`
    /// together with its carry flag.
    ///
    /// # Errors
    /// Returns `Error::CarryOverflow` if a second carry lands on a byte that
    /// already carries one, and propagates errors from `emit`.
    pub fn advance<F>(&mut self, low_update: u32, range: u32, mut emit: F) -> Result<()>
    where
        F: FnMut(u8, bool) -> Result<()>,
    {
        debug_assert!(range > 0);
        debug_assert!(u64::from(low_update) + u64::from(range) <= u64::from(self.range));

        let wide = u64::from(self.low) + u64::from(low_update);
        self.low = wide as u32;
        if wide >> REGISTER_BITS != 0 {
            self.absorb_carry()?;
        }
        self.range = range;

        while self.range < TOP {
            let bit = self.low >> (REGISTER_BITS - 1);
            self.low <<= 1;
            self.range <<= 1;
            if let Some((byte, carry)) = self.push_bit(bit) {
                emit(byte, carry)?;
            }
        }
        Ok(())
    }

    /// Emit the final byte.
    ///
    /// Picks the value in the interval with the fewest significant bits that
    /// still completes the partial byte; the decoder reads zeros past the end
    /// of the stream, so nothing after that byte needs writing. The register
    /// is reset afterwards.
    pub fn finish<F>(&mut self, mut emit: F) -> Result<()>
    where
        F: FnMut(u8, bool) -> Result<()>,
    {
        let step = 1u64 << (REGISTER_BITS - BYTE_BITS + self.pending_count);
        let window = (u64::from(self.low) + step - 1) & !(step - 1);
        debug_assert!(window - u64::from(self.low) < u64::from(self.range));
        if window >> REGISTER_BITS != 0 {
            self.absorb_carry()?;
        }

        let byte = flush_byte(self.pending_bits, self.pending_count, window as u32);
        let carry = self.carry;
        *self = Self::new();
        emit(byte, carry)
    }

    fn absorb_carry(&mut self) -> Result<()> {
        self.pending_bits += 1;
        if self.pending_bits >> self.pending_count != 0 {
            // every queued bit was a one
            if self.carry {
                return Err(Error::CarryOverflow);
            }
            self.pending_bits = 0;
            self.carry = true;
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: u32) -> Option<(u8, bool)> {
        self.pending_bits = (self.pending_bits << 1) | bit;
        self.pending_count += 1;
        if self.pending_count < BYTE_BITS {
            return None;
        }
        let byte = self.pending_bits as u8;
        let carry = std::mem::take(&mut self.carry);
        self.pending_bits = 0;
        self.pending_count = 0;
        Some((byte, carry))
    }
}

impl Default for CoderRegister {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(out: &mut Vec<(u8, bool)>) -> impl FnMut(u8, bool) -> Result<()> + '_ {
        move |byte, carry| {
            out.push((byte, carry));
            Ok(())
        }
    }

    #[test]
    fn test_flush_byte_traced_vector() {
        // queue 110, window top byte 0x60 contributes 01100
        assert_eq!(flush_byte(54, 3, 0x6000_0000), 0xCC);
    }

    #[test]
    fn test_flush_byte_raw_low_window() {
        assert_eq!(flush_byte(54, 3, 1_310_222_768), 0xC9);
    }

    #[test]
    fn test_flush_byte_empty_queue_takes_top_byte() {
        assert_eq!(flush_byte(0xFFFF, 0, 0xAB12_3456), 0xAB);
    }

    #[test]
    fn test_finish_emits_cc() {
        let mut reg = CoderRegister::from_parts(0x5C00_0000, 1 << 31, 54, 3).unwrap();
        assert_eq!(reg.pending_bits(), 0b110);

        let mut out = Vec::new();
        reg.finish(collect(&mut out)).unwrap();
        assert_eq!(out, vec![(0xCC, false)]);
        assert_eq!(reg, CoderRegister::new());
    }

    #[test]
    fn test_finish_window_can_carry() {
        // rounding low up to 2^28 overflows the register
        let mut reg = CoderRegister::from_parts(0xF800_0000, 1 << 31, 0b1111, 4).unwrap();
        let mut out = Vec::new();
        reg.finish(collect(&mut out)).unwrap();
        assert_eq!(out, vec![(0x00, true)]);
    }

    #[test]
    fn test_carry_into_queue_without_overflow() {
        let mut reg = CoderRegister::from_parts(0xFFFF_FFF0, 1 << 31, 0b101, 3).unwrap();
        let mut out = Vec::new();
        reg.advance(0x20, (1 << 31) - 0x20, collect(&mut out)).unwrap();
        assert!(out.is_empty());
        // queue 101 + 1 = 110, then one renormalization bit (0)
        assert_eq!(reg.pending_bits(), 0b1100);
        assert_eq!(reg.pending_count(), 4);
    }

    #[test]
    fn test_carry_out_of_full_queue_rides_next_byte() {
        let mut reg = CoderRegister::from_parts(0xFFFF_FFF0, 1 << 31, 0b111, 3).unwrap();
        let mut out = Vec::new();
        reg.advance(0x20, (1 << 31) - 0x20, collect(&mut out)).unwrap();
        assert!(out.is_empty());
        assert_eq!(reg.pending_bits(), 0);
        assert_eq!(reg.pending_count(), 4);

        reg.finish(collect(&mut out)).unwrap();
        assert_eq!(out, vec![(0x01, true)]);
    }

    #[test]
    fn test_renormalization_emits_whole_bytes() {
        let mut reg = CoderRegister::new();
        let mut out = Vec::new();
        // keep only the bottom 2^23 of the interval: eight zero bits come out
        reg.advance(0, 1 << 23, collect(&mut out)).unwrap();
        assert_eq!(out, vec![(0x00, false)]);
        assert_eq!(reg.pending_count(), 0);
        assert_eq!(reg.range(), TOP);
    }

    #[test]
    fn test_split_never_empty() {
        assert!(split(TOP, 0) > 0);
        assert!(split(u32::MAX, u16::MAX) < u32::MAX);
        assert_eq!(split(1 << 31, 1 << 15), 1 << 30);
    }

    #[test]
    fn test_from_parts_rejects_bad_state() {
        assert!(matches!(
            CoderRegister::from_parts(0, u32::MAX, 0, 8),
            Err(Error::InvalidRegister(_))
        ));
        assert!(matches!(
            CoderRegister::from_parts(0, 1 << 20, 0, 0),
            Err(Error::InvalidRegister(_))
        ));
    }
}
