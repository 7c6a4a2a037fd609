#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP layer for payment-gated clients.
//!
//! Builds on the `tollgate` core types with reqwest-based plumbing: a client
//! middleware that pays `402 Payment Required` challenges and retries once, a
//! cached identity credential backed by an HTTP authority, and an emitter that
//! posts content under that credential.
//!
//! # Modules
//!
//! - [`constants`] - Header names, status codes, defaults
//! - [`headers`] - Encoding and decoding of the payment headers
//! - [`gate`] - Client middleware that settles 402 challenges
//! - [`identity`] - HTTP credential authority and the identity cache
//! - [`emitter`] - Credentialed posting to the platform

pub mod constants;
pub mod emitter;
pub mod gate;
pub mod headers;
pub mod identity;

pub use emitter::{EmitterConfig, SignalEmitter};
pub use gate::{PaymentGate, WithPaymentGate};
pub use headers::{ChallengeError, ProofHeaderError};
pub use identity::{AuthorityConfig, HttpCredentialAuthority, IdentityCache};
