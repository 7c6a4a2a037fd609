//! Identity credential cache and the HTTP credential authority.
//!
//! [`HttpCredentialAuthority`] exchanges a long-lived API key for a
//! short-lived identity token at the authority's issuance endpoint.
//! [`IdentityCache`] sits on top and amortizes that exchange: one slot per
//! authority, refreshed proactively inside a safety margin before expiry.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tollgate::identity::{Credential, CredentialAuthority, CredentialError};
use tollgate::timestamp::{Clock, SystemClock, UnixTimestamp};
use tracing::{debug, info, warn};

use crate::constants::{
    API_KEY_ENV, DEFAULT_AUTHORITY_URL, DEFAULT_CREDENTIAL_LIFETIME, DEFAULT_REFRESH_MARGIN,
    IDENTITY_TOKEN_PATH,
};

/// Configuration for [`HttpCredentialAuthority`].
pub struct AuthorityConfig {
    /// Authority service base URL (without trailing slash).
    pub url: String,

    /// Long-lived API key exchanged for identity tokens. When absent,
    /// issuance fails fast without any network call.
    pub api_key: Option<String>,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Optional pre-configured reqwest client. If `None`, a new client is
    /// created with the configured timeout.
    pub http_client: Option<reqwest::Client>,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_AUTHORITY_URL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(30),
            http_client: None,
        }
    }
}

impl AuthorityConfig {
    /// Creates a config with the given authority URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates a config for the default authority, reading the API key from
    /// the `MOLTBOOK_API_KEY` environment variable.
    ///
    /// A missing variable leaves the key unset; issuance then fails with
    /// [`CredentialError::MissingApiKey`] before touching the network.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            ..Self::default()
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl fmt::Debug for AuthorityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorityConfig")
            .field("url", &self.url)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Wire shape of the authority's token-issuance response.
#[derive(Debug, Deserialize)]
struct IdentityTokenResponse {
    identity_token: String,
}

/// [`CredentialAuthority`] backed by the authority's HTTP issuance endpoint.
///
/// Sends `POST {url}/me/identity-token` with the API key as bearer
/// authentication and returns the `identity_token` field of the JSON
/// response.
pub struct HttpCredentialAuthority {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpCredentialAuthority {
    /// Creates an authority client from the given configuration.
    #[must_use]
    pub fn new(config: AuthorityConfig) -> Self {
        let base = config.url.trim_end_matches('/');
        let endpoint = format!("{base}/{IDENTITY_TOKEN_PATH}");

        let client = config.http_client.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("failed to build reqwest::Client")
        });

        Self {
            endpoint,
            api_key: config.api_key,
            client,
        }
    }

    /// Returns the token-issuance endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for HttpCredentialAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCredentialAuthority")
            .field("endpoint", &self.endpoint)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialAuthority for HttpCredentialAuthority {
    async fn issue(&self) -> Result<String, CredentialError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CredentialError::MissingApiKey)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| CredentialError::Transport {
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: IdentityTokenResponse =
            response
                .json()
                .await
                .map_err(|_| CredentialError::MalformedResponse {
                    context: "issuance response is not the expected JSON shape",
                })?;

        if body.identity_token.is_empty() {
            return Err(CredentialError::MalformedResponse {
                context: "identity_token field is empty",
            });
        }

        Ok(body.identity_token)
    }
}

/// Process-lifetime cache holding one bearer credential per authority.
///
/// A cached credential is served without any network call while it stays
/// clear of the safety margin before its expiry; after that, the next caller
/// refreshes it through the authority. The assumed lifetime is a configured
/// constant, not read from the authority's response.
///
/// The refresh path takes no lock across the network call: concurrent callers
/// that both find a stale slot both refresh, and the slot converges to
/// whichever response lands last. Every freshly issued credential is equally
/// valid, so last-write-wins is sound here.
///
/// # Example
///
/// ```no_run
/// use tollgate_http::identity::{AuthorityConfig, HttpCredentialAuthority, IdentityCache};
///
/// let authority = HttpCredentialAuthority::new(AuthorityConfig::from_env());
/// let cache = IdentityCache::new(authority);
/// ```
pub struct IdentityCache {
    authority: Arc<dyn CredentialAuthority>,
    clock: Arc<dyn Clock>,
    lifetime: Duration,
    margin: Duration,
    slot: RwLock<Option<Credential>>,
}

impl IdentityCache {
    /// Creates a cache over the given authority with the default lifetime
    /// and refresh margin.
    #[must_use]
    pub fn new(authority: impl CredentialAuthority + 'static) -> Self {
        Self::from_arc(Arc::new(authority))
    }

    /// Creates a cache from a shared authority handle.
    #[must_use]
    pub fn from_arc(authority: Arc<dyn CredentialAuthority>) -> Self {
        Self {
            authority,
            clock: Arc::new(SystemClock),
            lifetime: DEFAULT_CREDENTIAL_LIFETIME,
            margin: DEFAULT_REFRESH_MARGIN,
            slot: RwLock::new(None),
        }
    }

    /// Overrides the assumed credential lifetime.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Overrides the refresh safety margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Overrides the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a credential valid for at least the safety margin.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if a refresh was needed and the authority
    /// could not issue a token. The slot is left untouched on failure, so
    /// subsequent calls retry.
    pub async fn credential(&self) -> Result<Credential, CredentialError> {
        let now = self.clock.now();

        if let Some(cached) = self.cached(now).await {
            debug!(expires_at = %cached.expires_at(), "serving cached credential");
            return Ok(cached);
        }

        info!("refreshing identity credential");
        let token = self.authority.issue().await.inspect_err(|err| {
            warn!(error = %err, "credential refresh failed");
        })?;

        let credential = Credential::new(token, now + self.lifetime.as_secs());
        *self.slot.write().await = Some(credential.clone());
        Ok(credential)
    }

    /// Returns the cached credential if it is still fresh at `now`.
    async fn cached(&self, now: UnixTimestamp) -> Option<Credential> {
        let guard = self.slot.read().await;
        let cached = guard.as_ref()?;
        if cached.is_fresh(now, self.margin) {
            Some(cached.clone())
        } else {
            None
        }
    }

    /// Drops any cached credential; the next call refreshes.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

impl fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("lifetime", &self.lifetime)
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}
