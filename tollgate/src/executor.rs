//! Payment execution capability.
//!
//! [`PaymentExecutor`] is the narrow seam between the HTTP layer and whatever
//! performs the actual value transfer: a wallet, a custodial API, or the
//! [`SimulatedExecutor`] stand-in. A challenged client awaits exactly one
//! outcome per challenge, a proof or an error, and never calls the executor
//! again for the same challenge.

use async_trait::async_trait;
use rand::RngExt;
use rand::rng;

use crate::instructions::PaymentInstructions;
use crate::proof::{EmptyProofError, PaymentProof};

/// Capability that settles the payment described by [`PaymentInstructions`].
#[async_trait]
pub trait PaymentExecutor: Send + Sync {
    /// Executes the transfer and returns its proof.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError`] if the transfer fails or yields no usable
    /// proof.
    async fn execute(
        &self,
        instructions: &PaymentInstructions,
    ) -> Result<PaymentProof, ExecutorError>;
}

/// Errors from a payment executor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The transfer completed without yielding a usable proof.
    #[error(transparent)]
    EmptyProof(#[from] EmptyProofError),

    /// The executor does not operate on the requested network.
    #[error("unsupported payment network: {0}")]
    UnsupportedNetwork(String),

    /// The transfer itself failed.
    #[error("payment execution failed: {0}")]
    Failed(String),
}

/// Executor that fabricates a proof without moving any value.
///
/// Stands in for a real wallet during development and testing. Every call
/// succeeds with a fresh `0xsim`-prefixed proof, so downstream flow control
/// (retry, proof header, logging) can be exercised against services that
/// tolerate simulated settlement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedExecutor;

impl SimulatedExecutor {
    /// Creates a new simulated executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentExecutor for SimulatedExecutor {
    async fn execute(
        &self,
        _instructions: &PaymentInstructions,
    ) -> Result<PaymentProof, ExecutorError> {
        let nonce: u64 = rng().random();
        Ok(PaymentProof::new(format!("0xsim{nonce:016x}"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn instructions() -> PaymentInstructions {
        PaymentInstructions {
            amount: Decimal::from(5),
            currency: "USDC".to_owned(),
            destination: "0xabc".to_owned(),
            network: "base-sepolia".to_owned(),
        }
    }

    #[tokio::test]
    async fn simulated_executor_always_produces_a_proof() {
        let proof = SimulatedExecutor::new()
            .execute(&instructions())
            .await
            .unwrap();

        assert!(proof.as_str().starts_with("0xsim"));
        assert_eq!(proof.as_str().len(), "0xsim".len() + 16);
    }

    #[tokio::test]
    async fn simulated_proofs_are_unique_per_call() {
        let executor = SimulatedExecutor::new();
        let first = executor.execute(&instructions()).await.unwrap();
        let second = executor.execute(&instructions()).await.unwrap();

        assert_ne!(first, second);
    }
}
