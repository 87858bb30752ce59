//! Carry resolution between the coder register and the output stream.
//!
//! Bytes leave the register as `(byte, carry)` pairs. The emitter keeps the
//! most recent definite byte in hand, plus a [`PendingRun`] of `0xFF` bytes
//! behind it, so a carry can still reach both. Nothing appended to the
//! output is ever modified again.

use tracing::trace;

use crate::error::{Error, Result};
use crate::pending::PendingRun;

/// Resolves register output into final bytes.
#[derive(Clone, Debug, Default)]
pub struct ByteEmitter {
    output: Vec<u8>,
    head: Option<u8>,
    run: PendingRun,
    finished: bool,
}

impl ByteEmitter {
    /// Create an emitter with an empty output stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept one stabilized byte from the register.
    ///
    /// A carry is applied to the bytes already held before `byte` is placed.
    ///
    /// # Errors
    /// Returns `Error::CarryOverflow` if the carry has no byte to land on.
    pub fn emit(&mut self, byte: u8, carry: bool) -> Result<()> {
        debug_assert!(!self.finished, "emit after finalize");
        if carry {
            self.apply_carry()?;
        }
        self.place(byte);
        Ok(())
    }

    fn apply_carry(&mut self) -> Result<()> {
        let head = self
            .head
            .take()
            .and_then(|b| b.checked_add(1))
            .ok_or(Error::CarryOverflow)?;
        trace!(head, run = self.run.len(), "resolving carry");
        self.output.push(head);
        self.run.resolve_carry(&mut self.output);
        Ok(())
    }

    fn place(&mut self, byte: u8) {
        if self.head.is_some() && self.run.defer(byte) {
            return;
        }
        if let Some(prev) = self.head.replace(byte) {
            self.output.push(prev);
        }
        self.run.finalize(&mut self.output);
    }

    /// Write the held byte and any deferred run. Later calls do nothing.
    pub fn finalize(&mut self) {
        if self.finished {
            return;
        }
        if let Some(head) = self.head.take() {
            self.output.push(head);
        }
        self.run.finalize(&mut self.output);
        self.finished = true;
    }

    /// Bytes that are final so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Bytes still held back: the head byte plus the deferred run.
    pub fn held(&self) -> u64 {
        u64::from(self.head.is_some()) + self.run.len()
    }

    /// Finalize and take the output stream.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.finalize();
        self.output
    }
}
