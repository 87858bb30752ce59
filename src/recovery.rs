//! Recovery of a single lost trailing byte.
//!
//! The decoder is deterministic and never fails on short input, so it can
//! serve as an oracle: append each of the 256 possible byte values to the
//! truncated stream, decode, and keep the first candidate that reproduces the
//! known plaintext exactly.
//!
//! Candidates are tried in ascending order. Several may match, since any
//! value whose decoded interval still contains the final coding interval
//! decodes identically. The encoder always writes the smallest such value,
//! so the first match is the byte that was lost.

use rayon::prelude::*;
use tracing::debug;

use crate::coder::decode_bytes;
use crate::model::BitModel;

/// Decodes a candidate stream to a fixed number of bytes.
pub trait DecodeOracle {
    /// Decode `len` bytes from `stream`.
    fn decode(&self, stream: &[u8], len: usize) -> Vec<u8>;
}

impl<T: DecodeOracle + ?Sized> DecodeOracle for &T {
    fn decode(&self, stream: &[u8], len: usize) -> Vec<u8> {
        (**self).decode(stream, len)
    }
}

/// Oracle backed by the arithmetic decoder and a model factory.
///
/// A fresh model is built for every decode.
#[derive(Clone, Copy, Debug)]
pub struct ModelOracle<F>(pub F);

impl<M, F> DecodeOracle for ModelOracle<F>
where
    M: BitModel,
    F: Fn() -> M,
{
    fn decode(&self, stream: &[u8], len: usize) -> Vec<u8> {
        decode_bytes(&mut (self.0)(), stream, len)
    }
}

/// Search progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryState {
    /// `next` is the next candidate to try.
    Searching {
        /// Candidate value, `256` once every byte has been tried.
        next: u16,
    },
    /// The search ended.
    Done {
        /// The matching byte, or `None` if no candidate matched.
        recovered: Option<u8>,
    },
}

/// Exhaustive search for the last byte of a truncated stream.
pub struct TailRecovery<'a, O> {
    truncated: &'a [u8],
    plaintext: &'a [u8],
    oracle: O,
    state: RecoveryState,
}

impl<'a, O: DecodeOracle> TailRecovery<'a, O> {
    /// Prepare a search.
    ///
    /// # Arguments
    /// * `truncated` - The encoded stream with exactly its last byte removed
    /// * `plaintext` - The data that stream originally encoded
    /// * `oracle` - Decoder used to test candidates
    pub fn new(truncated: &'a [u8], plaintext: &'a [u8], oracle: O) -> Self {
        Self {
            truncated,
            plaintext,
            oracle,
            state: RecoveryState::Searching { next: 0 },
        }
    }

    /// Current state.
    pub fn state(&self) -> RecoveryState {
        self.state
    }

    /// Returns true if appending `candidate` reproduces the plaintext.
    pub fn matches(&self, candidate: u8) -> bool {
        let mut stream = Vec::with_capacity(self.truncated.len() + 1);
        stream.extend_from_slice(self.truncated);
        stream.push(candidate);
        self.oracle.decode(&stream, self.plaintext.len()) == self.plaintext
    }

    /// Try one candidate and return the new state.
    pub fn step(&mut self) -> RecoveryState {
        let RecoveryState::Searching { next } = self.state else {
            return self.state;
        };
        self.state = match u8::try_from(next) {
            Ok(candidate) if self.matches(candidate) => {
                debug!(candidate, "recovered trailing byte");
                RecoveryState::Done {
                    recovered: Some(candidate),
                }
            }
            Ok(_) => RecoveryState::Searching { next: next + 1 },
            Err(_) => {
                debug!(tried = next, "no candidate reproduced the plaintext");
                RecoveryState::Done { recovered: None }
            }
        };
        self.state
    }

    /// Run the search to completion.
    pub fn run(mut self) -> Option<u8> {
        loop {
            if let RecoveryState::Done { recovered } = self.step() {
                return recovered;
            }
        }
    }
}

impl<'a, O: DecodeOracle + Sync> TailRecovery<'a, O> {
    /// Run the search on the rayon thread pool.
    ///
    /// Returns the same answer as [`run`](Self::run): the lowest matching
    /// candidate wins even when several match.
    pub fn run_parallel(self) -> Option<u8> {
        let found = (0..=u8::MAX)
            .into_par_iter()
            .find_first(|&candidate| self.matches(candidate));
        match found {
            Some(candidate) => debug!(candidate, "recovered trailing byte"),
            None => debug!("no candidate reproduced the plaintext"),
        }
        found
    }
}

/// Recover the byte missing from the end of `truncated`.
///
/// `model` builds the probability model the stream was encoded with.
/// Returns `None` if no value reproduces `plaintext`, which means more than
/// one byte was lost or the model does not match the stream.
pub fn recover<M, F>(truncated: &[u8], plaintext: &[u8], model: F) -> Option<u8>
where
    M: BitModel,
    F: Fn() -> M,
{
    TailRecovery::new(truncated, plaintext, ModelOracle(model)).run()
}
