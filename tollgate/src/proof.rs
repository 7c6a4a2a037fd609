//! Opaque proof of payment attached to a retried request.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An opaque payment proof, typically a transaction hash.
///
/// A proof is always non-empty: executors signal failure through their error
/// channel, never through an empty proof string. Each proof is attached to
/// exactly one retried request and is not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof(String);

impl PaymentProof {
    /// Creates a proof from a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyProofError`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyProofError> {
        let value = value.into();
        if value.is_empty() {
            return Err(EmptyProofError);
        }
        Ok(Self(value))
    }

    /// Returns the proof as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the proof, returning the underlying string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PaymentProof {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PaymentProof {
    type Err = EmptyProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Error returned when a payment proof would be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("payment proof must be a non-empty string")]
pub struct EmptyProofError;
