//! Header decoding and encoding for the payment-challenge protocol.
//!
//! A challenge carries its instructions as plain JSON in the
//! `X-Payment-Instructions` response header; the settled proof travels back
//! in the `X-Payment-Proof` request header.

use http::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use tollgate::instructions::PaymentInstructions;
use tollgate::proof::PaymentProof;

use crate::constants::PAYMENT_INSTRUCTIONS_HEADER;

/// Reasons a 402 challenge cannot be acted on.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    /// The challenge carries no instructions header.
    #[error("challenge carries no X-Payment-Instructions header")]
    MissingInstructions,

    /// The instructions header value is not valid text.
    #[error("payment instructions header is not valid text")]
    NotText,

    /// The instructions are not valid JSON of the expected shape.
    #[error("malformed payment instructions: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Extracts payment instructions from a challenge's response headers.
///
/// # Errors
///
/// Returns [`ChallengeError`] if the header is absent, not text, or not the
/// expected JSON shape.
pub fn decode_payment_instructions(
    headers: &HeaderMap,
) -> Result<PaymentInstructions, ChallengeError> {
    let value = headers
        .get(PAYMENT_INSTRUCTIONS_HEADER)
        .ok_or(ChallengeError::MissingInstructions)?;
    let raw = value.to_str().map_err(|_| ChallengeError::NotText)?;
    Ok(serde_json::from_str(raw)?)
}

/// Error for proofs that cannot be carried in an HTTP header.
#[derive(Debug, thiserror::Error)]
#[error("payment proof is not a valid header value")]
pub struct ProofHeaderError(#[from] InvalidHeaderValue);

/// Encodes a payment proof as the retry header value.
///
/// # Errors
///
/// Returns [`ProofHeaderError`] if the proof contains bytes that cannot
/// appear in an HTTP header.
pub fn encode_payment_proof(proof: &PaymentProof) -> Result<HeaderValue, ProofHeaderError> {
    Ok(HeaderValue::from_str(proof.as_str())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn decodes_instructions_from_the_challenge_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            PAYMENT_INSTRUCTIONS_HEADER,
            HeaderValue::from_static(
                r#"{"amount":"5","currency":"USDC","destination":"0xabc","network":"base-sepolia"}"#,
            ),
        );

        let instructions = decode_payment_instructions(&headers).unwrap();
        assert_eq!(instructions.amount, Decimal::from(5));
        assert_eq!(instructions.network, "base-sepolia");
    }

    #[test]
    fn missing_header_is_reported() {
        let headers = HeaderMap::new();
        assert!(matches!(
            decode_payment_instructions(&headers),
            Err(ChallengeError::MissingInstructions)
        ));
    }

    #[test]
    fn non_text_header_is_reported() {
        let mut headers = HeaderMap::new();
        headers.insert(
            PAYMENT_INSTRUCTIONS_HEADER,
            HeaderValue::from_bytes(&[0xff]).unwrap(),
        );

        assert!(matches!(
            decode_payment_instructions(&headers),
            Err(ChallengeError::NotText)
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut headers = HeaderMap::new();
        headers.insert(
            PAYMENT_INSTRUCTIONS_HEADER,
            HeaderValue::from_static("pay me"),
        );

        assert!(matches!(
            decode_payment_instructions(&headers),
            Err(ChallengeError::Malformed(_))
        ));
    }

    #[test]
    fn encodes_a_proof_as_a_header_value() {
        let proof = PaymentProof::new("0xdeadbeef").unwrap();
        assert_eq!(encode_payment_proof(&proof).unwrap(), "0xdeadbeef");
    }

    #[test]
    fn rejects_proofs_with_header_breaking_bytes() {
        let proof = PaymentProof::new("0xdead\nbeef").unwrap();
        assert!(encode_payment_proof(&proof).is_err());
    }
}
