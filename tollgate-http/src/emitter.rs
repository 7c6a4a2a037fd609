//! Credentialed posting to the platform.
//!
//! [`SignalEmitter`] is the one caller of the identity flow: it fetches a
//! credential from the [`IdentityCache`], attaches it as the identity header,
//! and POSTs a content payload. The `emit` contract is a bare boolean; every
//! failure degrades to `false` with a warn log, so posting sites stay
//! fire-and-forget.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::constants::{DEFAULT_EMITTER_ORIGIN, IDENTITY_HEADER};
use crate::identity::IdentityCache;

/// Configuration for [`SignalEmitter`].
#[derive(Debug)]
pub struct EmitterConfig {
    /// Full URL posts are sent to.
    pub post_url: String,

    /// Origin tag stamped on every post.
    pub origin: String,

    /// Optional pre-configured reqwest client.
    pub http_client: Option<reqwest::Client>,
}

impl EmitterConfig {
    /// Creates a config posting to `post_url` with the default origin.
    #[must_use]
    pub fn new(post_url: impl Into<String>) -> Self {
        Self {
            post_url: post_url.into(),
            origin: DEFAULT_EMITTER_ORIGIN.to_owned(),
            http_client: None,
        }
    }

    /// Sets the origin tag.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

/// Wire shape of an emitted post.
#[derive(Debug, Serialize)]
struct SignalPayload<'a> {
    content: &'a str,
    origin: &'a str,
}

/// Posts content to the platform under a cached identity credential.
pub struct SignalEmitter {
    identity: Arc<IdentityCache>,
    client: reqwest::Client,
    post_url: String,
    origin: String,
}

impl SignalEmitter {
    /// Creates an emitter that authenticates through `identity`.
    #[must_use]
    pub fn new(identity: Arc<IdentityCache>, config: EmitterConfig) -> Self {
        Self {
            identity,
            client: config.http_client.unwrap_or_default(),
            post_url: config.post_url,
            origin: config.origin,
        }
    }

    /// Posts `content`, returning whether the platform accepted it.
    ///
    /// At most one POST is issued. A credential failure, an HTTP error
    /// status, and a transport error all log and return `false`; nothing is
    /// retried.
    pub async fn emit(&self, content: &str) -> bool {
        let credential = match self.identity.credential().await {
            Ok(credential) => credential,
            Err(err) => {
                warn!(error = %err, "cannot emit without an identity credential");
                return false;
            }
        };

        let payload = SignalPayload {
            content,
            origin: &self.origin,
        };
        let response = self
            .client
            .post(&self.post_url)
            .header(IDENTITY_HEADER, credential.token())
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                info!(status = %response.status(), "emitted signal");
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "platform rejected emitted signal");
                false
            }
            Err(err) => {
                warn!(error = %err, "signal emission failed in transport");
                false
            }
        }
    }
}

impl fmt::Debug for SignalEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalEmitter")
            .field("post_url", &self.post_url)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tollgate::identity::{CredentialAuthority, CredentialError, StaticCredentialAuthority};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn emitter_for(server: &MockServer, authority: impl CredentialAuthority + 'static) -> SignalEmitter {
        let cache = Arc::new(IdentityCache::new(authority));
        SignalEmitter::new(cache, EmitterConfig::new(format!("{}/post", server.uri())))
    }

    #[tokio::test]
    async fn emits_content_with_the_identity_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/post"))
            .and(header(IDENTITY_HEADER, "tok-1"))
            .and(body_json(serde_json::json!({
                "content": "hello",
                "origin": "tollgate"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let emitter = emitter_for(&server, StaticCredentialAuthority::new("tok-1"));
        assert!(emitter.emit("hello").await);
    }

    #[tokio::test]
    async fn a_custom_origin_is_stamped_on_the_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/post"))
            .and(body_json(serde_json::json!({
                "content": "hi",
                "origin": "scout.7"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let cache = Arc::new(IdentityCache::new(StaticCredentialAuthority::new("tok-1")));
        let emitter = SignalEmitter::new(
            cache,
            EmitterConfig::new(format!("{}/post", server.uri())).with_origin("scout.7"),
        );

        assert!(emitter.emit("hi").await);
    }

    #[tokio::test]
    async fn a_credential_failure_means_no_post_at_all() {
        struct BrokenAuthority;

        #[async_trait]
        impl CredentialAuthority for BrokenAuthority {
            async fn issue(&self) -> Result<String, CredentialError> {
                Err(CredentialError::MissingApiKey)
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let emitter = emitter_for(&server, BrokenAuthority);
        assert!(!emitter.emit("hello").await);
    }

    #[tokio::test]
    async fn a_platform_rejection_is_false_and_never_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/post"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let emitter = emitter_for(&server, StaticCredentialAuthority::new("tok-1"));
        assert!(!emitter.emit("hello").await);
    }

    #[tokio::test]
    async fn a_transport_error_is_false() {
        let cache = Arc::new(IdentityCache::new(StaticCredentialAuthority::new("tok-1")));
        let emitter = SignalEmitter::new(cache, EmitterConfig::new("http://127.0.0.1:9/post"));

        assert!(!emitter.emit("hello").await);
    }
}
