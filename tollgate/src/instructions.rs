//! Machine-readable payment instructions carried by a 402 challenge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment instructions advertised by a paying service in a 402 challenge.
///
/// The challenged client forwards these unchanged to its
/// [`PaymentExecutor`](crate::executor::PaymentExecutor). Instructions are
/// constructed once per challenge and discarded after a single payment
/// attempt; they are never persisted or reused.
///
/// # Serialization
///
/// Instructions travel as a JSON object. The `amount` is a decimal string to
/// avoid floating-point loss on asset amounts:
///
/// ```json
/// {
///   "amount": "5",
///   "currency": "USDC",
///   "destination": "0xabc",
///   "network": "base-sepolia"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstructions {
    /// Amount of value to transfer, denominated in `currency`.
    pub amount: Decimal,
    /// Asset symbol the amount is denominated in (e.g. `USDC`).
    pub currency: String,
    /// Receiving address on `network`.
    pub destination: String,
    /// Chain identifier the transfer must settle on (e.g. `base-sepolia`).
    pub network: String,
}
