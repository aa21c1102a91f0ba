//! Errors related to proving and verifying proofs.

use failure::Fail;

/// Represents an error in proof creation, verification, or parsing.
///
/// Verification never reports *which* equation failed: every negative
/// outcome of a completed verification is [`ProofError::VerificationError`].
#[derive(Fail, Clone, Debug, Eq, PartialEq)]
pub enum ProofError {
    /// The proof parameters are unusable, e.g. `k > N`, `k = 0`, or the
    /// generator set is too small. Raised before any commitment is produced.
    #[fail(display = "Invalid proof configuration: {}", _0)]
    ConfigurationError(&'static str),
    /// Two vectors that must be combined elementwise have different lengths.
    #[fail(display = "Vector lengths do not match: {} != {}", _0, _1)]
    LengthMismatch(usize, usize),
    /// Selector sampling kept hitting already-chosen slots and gave up.
    #[fail(display = "Selector sampling exhausted its retry budget.")]
    SamplingCollision,
    /// A scalar that must be inverted was zero, e.g. a zero challenge.
    /// The session must be restarted with fresh randomness.
    #[fail(display = "Attempted to invert the zero scalar.")]
    ArithmeticError,
    /// The proof did not verify.
    #[fail(display = "Proof verification failed.")]
    VerificationError,
    /// The proof bytes could not be parsed.
    #[fail(display = "Proof data could not be parsed.")]
    FormatError,
}
