//! Bearer credentials and the credential-issuing capability.
//!
//! A [`Credential`] pairs a short-lived bearer token with an absolute expiry.
//! Tokens come from a [`CredentialAuthority`]: either a remote issuance
//! endpoint (see `tollgate-http`) or the [`StaticCredentialAuthority`] for
//! platforms that hand out a long-lived token directly. Expiry bookkeeping is
//! the caller's concern; authorities return only the raw token.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::timestamp::UnixTimestamp;

/// A bearer token with an absolute expiry.
#[derive(Clone)]
pub struct Credential {
    token: String,
    expires_at: UnixTimestamp,
}

impl Credential {
    /// Creates a credential expiring at `expires_at`.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: UnixTimestamp) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the absolute expiry.
    #[must_use]
    pub const fn expires_at(&self) -> UnixTimestamp {
        self.expires_at
    }

    /// Returns whether the credential is usable at `now` while staying clear
    /// of the safety `margin` before expiry.
    ///
    /// A credential exactly `margin` seconds away from expiry is already
    /// considered stale.
    #[must_use]
    pub fn is_fresh(&self, now: UnixTimestamp, margin: Duration) -> bool {
        now.as_secs().saturating_add(margin.as_secs()) < self.expires_at.as_secs()
    }
}

/// The token itself is redacted.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Capability that issues a fresh bearer token.
///
/// Implementations exchange a long-lived secret for a short-lived identity
/// token. They return only the token string; callers decide how long to trust
/// it.
#[async_trait]
pub trait CredentialAuthority: Send + Sync {
    /// Issues a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if no token can be issued.
    async fn issue(&self) -> Result<String, CredentialError>;
}

/// Errors from credential issuance.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// No API key is configured for the authority.
    #[error("identity API key is not configured")]
    MissingApiKey,

    /// The authority answered with a non-success status.
    #[error("authority rejected credential request ({status}): {body}")]
    Rejected {
        /// The HTTP status code.
        status: u16,
        /// The response body.
        body: String,
    },

    /// The authority response could not be decoded.
    #[error("malformed authority response: {context}")]
    MalformedResponse {
        /// Human-readable context.
        context: &'static str,
    },

    /// Transport-level failure reaching the authority.
    #[error("authority transport error: {source}")]
    Transport {
        /// The underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// [`CredentialAuthority`] that returns a fixed, pre-issued token.
///
/// Useful when the platform hands out a long-lived token out of band and no
/// refresh exchange exists. Issuance never fails.
#[derive(Clone)]
pub struct StaticCredentialAuthority {
    token: String,
}

impl StaticCredentialAuthority {
    /// Creates an authority that always issues `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticCredentialAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialAuthority")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialAuthority for StaticCredentialAuthority {
    async fn issue(&self) -> Result<String, CredentialError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: Duration = Duration::from_secs(60);

    fn credential_expiring_at(secs: u64) -> Credential {
        Credential::new("tok-1", UnixTimestamp::from_secs(secs))
    }

    #[test]
    fn fresh_well_before_the_margin() {
        let credential = credential_expiring_at(3600);
        assert!(credential.is_fresh(UnixTimestamp::from_secs(3500), MARGIN));
    }

    #[test]
    fn stale_at_the_margin_boundary() {
        let credential = credential_expiring_at(3600);
        assert!(!credential.is_fresh(UnixTimestamp::from_secs(3540), MARGIN));
    }

    #[test]
    fn stale_inside_the_margin() {
        let credential = credential_expiring_at(3600);
        assert!(!credential.is_fresh(UnixTimestamp::from_secs(3550), MARGIN));
    }

    #[test]
    fn stale_after_expiry() {
        let credential = credential_expiring_at(3600);
        assert!(!credential.is_fresh(UnixTimestamp::from_secs(4000), MARGIN));
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let rendered = format!("{:?}", credential_expiring_at(3600));
        assert!(!rendered.contains("tok-1"));
        assert!(rendered.contains("3600"));
    }

    #[tokio::test]
    async fn static_authority_issues_its_token() {
        let authority = StaticCredentialAuthority::new("fixed-token");
        assert_eq!(authority.issue().await.unwrap(), "fixed-token");
    }

    #[test]
    fn static_authority_debug_redacts_its_token() {
        let authority = StaticCredentialAuthority::new("fixed-token");
        assert!(!format!("{authority:?}").contains("fixed-token"));
    }
}
