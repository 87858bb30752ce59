//! Binary arithmetic encoder and decoder.
//!
//! The encoder drives a [`CoderRegister`] and routes every completed byte
//! through a [`ByteEmitter`]. The decoder mirrors the register arithmetic on
//! a `code` value read from the stream, one bit per renormalization step.
//! Past the end of its input the decoder reads zeros, so any prefix of a
//! stream decodes deterministically.

use tracing::debug;

use crate::emitter::ByteEmitter;
use crate::error::Result;
use crate::model::BitModel;
use crate::register::{split, CoderRegister, REGISTER_BITS, TOP};

/// Binary arithmetic encoder.
#[derive(Clone, Debug, Default)]
pub struct ArithmeticEncoder {
    register: CoderRegister,
    emitter: ByteEmitter,
}

impl ArithmeticEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one bit.
    ///
    /// # Arguments
    /// * `bit` - The bit to encode (any non-zero value is a 1)
    /// * `p1` - Probability of a 1 bit, scaled by `2^16`
    ///
    /// # Errors
    /// Returns `Error::CarryOverflow` if a carry escapes the stream.
    pub fn encode(&mut self, bit: u8, p1: u16) -> Result<()> {
        let bound = split(self.register.range(), p1);
        let (low_update, range) = if bit != 0 {
            (0, bound)
        } else {
            (bound, self.register.range() - bound)
        };
        let emitter = &mut self.emitter;
        self.register
            .advance(low_update, range, |byte, carry| emitter.emit(byte, carry))
    }

    /// Current register state.
    pub fn register(&self) -> &CoderRegister {
        &self.register
    }

    /// Finish encoding and return the compressed data.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let emitter = &mut self.emitter;
        self.register
            .finish(|byte, carry| emitter.emit(byte, carry))?;
        let bytes = self.emitter.into_bytes();
        debug!(len = bytes.len(), "encoder finished");
        Ok(bytes)
    }
}

/// MSB-first bit reader that yields zeros past the end of its input.
#[derive(Clone, Debug)]
pub struct BitSource<'a> {
    data: &'a [u8],
    pos: usize,
    shift: u32,
}

impl<'a> BitSource<'a> {
    /// Read from `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            shift: u8::BITS,
        }
    }

    /// Next bit, or 0 once the input is exhausted.
    #[inline]
    pub fn next_bit(&mut self) -> u32 {
        let Some(&byte) = self.data.get(self.pos) else {
            return 0;
        };
        self.shift -= 1;
        let bit = u32::from(byte >> self.shift) & 1;
        if self.shift == 0 {
            self.shift = u8::BITS;
            self.pos += 1;
        }
        bit
    }

    /// Returns true once every input bit has been read.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }
}

/// Binary arithmetic decoder.
#[derive(Clone, Debug)]
pub struct ArithmeticDecoder<'a> {
    source: BitSource<'a>,
    code: u32,
    range: u32,
}

impl<'a> ArithmeticDecoder<'a> {
    /// Create a decoder over a compressed stream.
    ///
    /// The first 32 bits fill the code register; missing bytes count as 0.
    pub fn new(stream: &'a [u8]) -> Self {
        let mut source = BitSource::new(stream);
        let mut code = 0u32;
        for _ in 0..REGISTER_BITS {
            code = (code << 1) | source.next_bit();
        }
        Self {
            source,
            code,
            range: u32::MAX,
        }
    }

    /// Decode one bit coded with probability `p1`.
    ///
    /// Never fails: malformed or truncated input decodes to some bit.
    pub fn decode(&mut self, p1: u16) -> u8 {
        let bound = split(self.range, p1);
        let bit = if self.code < bound {
            self.range = bound;
            1
        } else {
            self.code -= bound;
            self.range -= bound;
            0
        };

        while self.range < TOP {
            self.code = (self.code << 1) | self.source.next_bit();
            self.range <<= 1;
        }
        bit
    }
}

/// Encode `data` MSB first, eight modeled bits per byte.
///
/// # Errors
/// Returns `Error::CarryOverflow` if the register arithmetic breaks.
pub fn encode_bytes<M: BitModel>(model: &mut M, data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ArithmeticEncoder::new();
    for &byte in data {
        for i in (0..u8::BITS).rev() {
            let bit = (byte >> i) & 1;
            encoder.encode(bit, model.p1())?;
            model.update(bit);
        }
    }
    encoder.finish()
}

/// Decode `len` bytes from `stream`.
///
/// The model must start in the state the encoder's model started in.
pub fn decode_bytes<M: BitModel>(model: &mut M, stream: &[u8], len: usize) -> Vec<u8> {
    let mut decoder = ArithmeticDecoder::new(stream);
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let mut byte = 0u8;
        for _ in 0..u8::BITS {
            let bit = decoder.decode(model.p1());
            model.update(bit);
            byte = (byte << 1) | bit;
        }
        out.push(byte);
    }
    out
}
