//! Deferred runs of carry-sensitive bytes.
//!
//! A byte equal to [`FILL_BYTE`] cannot be written yet: a carry arriving
//! later would turn it into `0x00` and bump the byte before it. Such bytes
//! are only counted here until something decides their value.

/// Byte value that a later carry can still flip.
pub const FILL_BYTE: u8 = 0xFF;

/// Value the deferred bytes will be written as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Polarity {
    /// No carry arrived; the run is written as `0xFF`.
    #[default]
    AllOnes,
    /// A carry rippled through; the run is written as `0x00`.
    AllZeros,
}

impl Polarity {
    /// The byte every deferred position takes under this polarity.
    pub fn fill(self) -> u8 {
        match self {
            Polarity::AllOnes => FILL_BYTE,
            Polarity::AllZeros => FILL_BYTE.wrapping_add(1),
        }
    }

    fn flipped(self) -> Self {
        match self {
            Polarity::AllOnes => Polarity::AllZeros,
            Polarity::AllZeros => Polarity::AllOnes,
        }
    }
}

/// A run of deferred bytes awaiting a carry decision.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingRun {
    polarity: Polarity,
    length: u64,
}

impl PendingRun {
    /// Create an empty run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deferred bytes.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Returns true if no bytes are deferred.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Current polarity. Meaningless while the run is empty.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Offer a byte to the run.
    ///
    /// Returns `true` if the byte is the fill value and was absorbed, `false`
    /// if it is definite and the caller must write it after flushing the run.
    pub fn defer(&mut self, byte: u8) -> bool {
        if byte != FILL_BYTE {
            return false;
        }
        if self.length == 0 {
            self.polarity = Polarity::AllOnes;
        }
        self.length += 1;
        true
    }

    /// A carry arrived: the whole run flips and is written out.
    pub fn resolve_carry(&mut self, out: &mut Vec<u8>) {
        self.polarity = self.polarity.flipped();
        self.finalize(out);
    }

    /// Write the run at its current polarity and reset it.
    pub fn finalize(&mut self, out: &mut Vec<u8>) {
        let fill = self.polarity.fill();
        out.extend(std::iter::repeat(fill).take(self.length as usize));
        self.length = 0;
        self.polarity = Polarity::AllOnes;
    }
}
