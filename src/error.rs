//! Error types for the binary arithmetic coder.

use thiserror::Error;

/// Error variants for coder operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A carry propagated past the first output byte.
    ///
    /// No earlier byte exists to absorb it, so the interval arithmetic that
    /// produced it is broken.
    #[error("carry propagated beyond the start of the stream")]
    CarryOverflow,

    /// Register parts passed to a constructor violate its invariants.
    #[error("invalid register state: {0}")]
    InvalidRegister(&'static str),
}

/// A specialized Result type for coder operations.
pub type Result<T> = std::result::Result<T, Error>;
