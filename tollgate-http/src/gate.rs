//! Reqwest middleware that settles 402 payment challenges and retries once.
//!
//! [`PaymentGate`] sits in a `reqwest-middleware` stack. Responses other than
//! `402 Payment Required` pass through untouched. On a 402 it decodes the
//! challenge instructions, drives the injected
//! [`PaymentExecutor`](tollgate::executor::PaymentExecutor), and replays the
//! original request exactly once with the proof attached. Anything that goes
//! wrong inside the payment flow fails open: the caller receives the original
//! challenge response, never a synthetic error. Only transport failures
//! propagate as errors.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::{Extensions, StatusCode};
use reqwest::{Request, Response};
use reqwest_middleware as rqm;
use tokio::time::timeout;
use tollgate::executor::PaymentExecutor;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_PAYMENT_DEADLINE, PAYMENT_PROOF_HEADER};
use crate::headers::{decode_payment_instructions, encode_payment_proof};

/// Reqwest middleware that makes requests tolerant of payment challenges.
///
/// The gate holds no per-request state; it owns only the payment capability
/// and the execution deadline. A single gate can serve any number of
/// concurrent requests.
///
/// # Example
///
/// ```no_run
/// use tollgate::SimulatedExecutor;
/// use tollgate_http::gate::{PaymentGate, WithPaymentGate};
///
/// let client = reqwest::Client::new()
///     .with_payment_gate(PaymentGate::new(SimulatedExecutor::new()));
/// // Requests through `client` now settle 402 challenges transparently.
/// ```
pub struct PaymentGate {
    executor: Arc<dyn PaymentExecutor>,
    deadline: Duration,
}

impl PaymentGate {
    /// Creates a gate that settles challenges with `executor`.
    #[must_use]
    pub fn new(executor: impl PaymentExecutor + 'static) -> Self {
        Self::from_arc(Arc::new(executor))
    }

    /// Creates a gate from a shared executor handle.
    #[must_use]
    pub fn from_arc(executor: Arc<dyn PaymentExecutor>) -> Self {
        Self {
            executor,
            deadline: DEFAULT_PAYMENT_DEADLINE,
        }
    }

    /// Sets the deadline for a single payment execution.
    ///
    /// A payment that outruns the deadline counts as failed and the original
    /// challenge is returned to the caller.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns the configured payment deadline.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        self.deadline
    }
}

impl fmt::Debug for PaymentGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentGate")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl rqm::Middleware for PaymentGate {
    /// Sends a request, paying a 402 challenge and retrying once if needed.
    ///
    /// The retry is never itself subject to interception, so a service that
    /// keeps answering 402 costs at most one payment per call.
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: rqm::Next<'_>,
    ) -> rqm::Result<Response> {
        // Cloned up front: the body is consumed by the first send.
        let retry_req = req.try_clone();
        let res = next.clone().run(req, extensions).await?;

        if res.status() != StatusCode::PAYMENT_REQUIRED {
            debug!(status = %res.status(), "no payment challenge, passing response through");
            return Ok(res);
        }

        info!(url = %res.url(), "received 402 payment challenge");

        let instructions = match decode_payment_instructions(res.headers()) {
            Ok(instructions) => instructions,
            Err(err) => {
                warn!(error = %err, "unusable payment challenge, returning it unpaid");
                return Ok(res);
            }
        };

        // A streaming body cannot be replayed; pay nothing and fail open.
        let Some(mut retry) = retry_req else {
            warn!("request body cannot be replayed, returning challenge unpaid");
            return Ok(res);
        };

        let proof = match timeout(self.deadline, self.executor.execute(&instructions)).await {
            Ok(Ok(proof)) => proof,
            Ok(Err(err)) => {
                warn!(error = %err, "payment execution failed, returning challenge unpaid");
                return Ok(res);
            }
            Err(_) => {
                warn!(deadline = ?self.deadline, "payment execution hit its deadline, returning challenge unpaid");
                return Ok(res);
            }
        };

        let value = match encode_payment_proof(&proof) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "payment proof cannot travel as a header, returning challenge unpaid");
                return Ok(res);
            }
        };

        info!(proof = %proof, "payment settled, retrying request once");
        retry.headers_mut().insert(PAYMENT_PROOF_HEADER, value);
        next.run(retry, extensions).await
    }
}

/// Attaches a [`PaymentGate`] to a reqwest client.
pub trait WithPaymentGate {
    /// Wraps the client so every request tolerates a payment challenge.
    #[must_use]
    fn with_payment_gate(self, gate: PaymentGate) -> rqm::ClientWithMiddleware;
}

impl WithPaymentGate for reqwest::Client {
    fn with_payment_gate(self, gate: PaymentGate) -> rqm::ClientWithMiddleware {
        rqm::ClientBuilder::new(self).with(gate).build()
    }
}
