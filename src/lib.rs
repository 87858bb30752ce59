//! # Binary Arithmetic Coding with Carry Propagation
//!
//! *Bit-exact carry handling for an adaptive binary arithmetic coder, and
//! recovery of a lost trailing byte using the decoder as an oracle.*
//!
//! ## Intuition First
//!
//! An arithmetic coder describes a whole message as one very long binary
//! fraction. Each coded bit narrows an interval; once the leading digits of
//! both ends agree they can be written out. The catch is that the encoder
//! only tracks the *lower* end, and adding to it can carry into digits that
//! look finished. A byte of `0xFF` is exactly such a digit: a later carry
//! turns it into `0x00` and bumps whatever came before.
//!
//! The fix is to hold such bytes back. The coder keeps the last definite byte
//! and a count of `0xFF` bytes after it; a carry increments the former and
//! zeroes the latter, while any other byte settles both as they are.
//!
//! ## The Problem
//!
//! - **Carry-less coders** (E3 / pending-bit schemes) avoid carries by
//!   tracking an underflow count but pay a branch per bit.
//! - **Carry coders** are simpler per bit but must never let a byte reach
//!   the output while a carry could still change it.
//!
//! ## Historical Context
//!
//! ```text
//! 1976  Rissanen       Arithmetic coding with finite precision
//! 1979  Martin         Range coding: byte-oriented renormalization
//! 1987  Witten et al.  CACM coder with pending (E3) bits
//! 1998  Schindler      Carry-propagating range coder
//! 1999  Pavlov         LZMA range coder: cache byte plus 0xFF run
//! ```
//!
//! ## Mathematical Formulation
//!
//! With interval `[low, low + range)` and probability `p1 / 2^16` of a one:
//!
//! ```text
//! bound = (range * p1) >> 16
//! bit 1: range' = bound
//! bit 0: low'   = low + bound,  range' = range - bound
//! ```
//!
//! `low` is 32 bits wide; when `low + bound >= 2^32` the overflow is the
//! carry. Renormalization doubles `range` while it is below `2^31`, moving
//! the top bit of `low` into a bit queue that is cut into bytes.
//!
//! ## Truncated Tail Recovery
//!
//! The decoder reads zeros past the end of its input and so returns *some*
//! output for any prefix of a stream. Given the plaintext, the one missing
//! final byte can be found by trying all 256 values and keeping the first one
//! that decodes back to the plaintext.
//!
//! ## Failure Modes
//!
//! 1. **Carry past the first byte**: impossible for correct interval
//!    arithmetic; reported as [`Error::CarryOverflow`] instead of being lost.
//! 2. **Model mismatch**: the decoder does not detect it; output is simply
//!    wrong, and tail recovery finds no candidate.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`CoderRegister`]**, **[`ByteEmitter`]**, **[`PendingRun`]**: the
//!   carry-safe emission path.
//! - **[`ArithmeticEncoder`]** / **[`ArithmeticDecoder`]**: the bit coder,
//!   driven by any [`BitModel`].
//! - **[`TailRecovery`]**: the oracle search, sequential or on rayon.
//!
//! ## References
//!
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic coding for data compression."
//! - Martin, G. N. N. (1979). "Range encoding: an algorithm for removing redundancy from a digitised message."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coder;
pub mod emitter;
pub mod error;
pub mod model;
pub mod pending;
pub mod recovery;
pub mod register;

pub use coder::{decode_bytes, encode_bytes, ArithmeticDecoder, ArithmeticEncoder};
pub use emitter::ByteEmitter;
pub use error::Error;
pub use model::{BitModel, Order0, StaticModel};
pub use pending::{PendingRun, Polarity};
pub use recovery::{recover, DecodeOracle, ModelOracle, RecoveryState, TailRecovery};
pub use register::CoderRegister;
