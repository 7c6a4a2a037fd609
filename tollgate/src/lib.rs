#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for payment-gated HTTP clients.
//!
//! This crate provides the foundational types for building HTTP clients that
//! transparently tolerate `402 Payment Required` challenges: the wire shape of
//! a payment challenge, the proof attached to a retried request, the bearer
//! credential used for identity-authenticated calls, and the narrow capability
//! interfaces behind which payment execution and credential issuance live.
//!
//! It is deliberately transport-free. The HTTP interception itself, the
//! credential cache, and the authority client are provided by the
//! `tollgate-http` crate; everything here can be exercised with plain in-memory
//! fakes.
//!
//! # Modules
//!
//! - [`executor`] - Payment execution capability and the simulated fallback
//! - [`identity`] - Bearer credentials and the credential-issuing capability
//! - [`instructions`] - Machine-readable payment instructions from a challenge
//! - [`proof`] - Opaque payment proof carried by the retried request
//! - [`timestamp`] - Unix timestamps and the injectable clock

pub mod executor;
pub mod identity;
pub mod instructions;
pub mod proof;
pub mod timestamp;

pub use executor::{ExecutorError, PaymentExecutor, SimulatedExecutor};
pub use identity::{Credential, CredentialAuthority, CredentialError, StaticCredentialAuthority};
pub use instructions::PaymentInstructions;
pub use proof::{EmptyProofError, PaymentProof};
pub use timestamp::{Clock, SystemClock, UnixTimestamp};
