//! Error types for the Bloch-sphere engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, BlochError>;

/// Errors produced while applying gates or animating them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlochError {
    /// A character in a gate sequence has no catalog entry.
    #[error("Unrecognized gate symbol {symbol:?} at position {position}")]
    UnrecognizedGateSymbol {
        /// The offending character.
        symbol: char,
        /// Character index inside the sequence.
        position: usize,
    },

    /// A rotation angle did not parse as a finite number.
    #[error("Invalid numeric input {input:?}")]
    InvalidNumericInput {
        /// The raw text that was rejected.
        input: String,
    },

    /// A rotation axis of zero length (or with non-finite components).
    #[error("Rotation axis must be a finite, non-zero vector")]
    InvalidAxis,

    /// A rotation gate name other than `Rx`, `Ry`, `Rz` or a bare axis letter.
    #[error("Unknown rotation axis {input:?}")]
    UnknownRotationAxis {
        input: String,
    },

    /// A gate produced NaN/inf amplitudes or a zero-norm vector.
    #[error("Gate application produced a non-finite state")]
    NonFiniteState,

    /// A state could not be built from the given amplitudes or label.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
