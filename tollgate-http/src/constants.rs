//! HTTP constants for the payment-challenge protocol and the identity service.

use std::time::Duration;

/// Response header carrying JSON payment instructions (server → client).
pub const PAYMENT_INSTRUCTIONS_HEADER: &str = "X-Payment-Instructions";

/// Request header carrying the payment proof on the retried request (client → server).
pub const PAYMENT_PROOF_HEADER: &str = "X-Payment-Proof";

/// Request header carrying the identity token on emitted posts.
pub const IDENTITY_HEADER: &str = "X-Moltbook-Identity";

/// HTTP 402 Payment Required status code.
pub const HTTP_STATUS_PAYMENT_REQUIRED: u16 = 402;

/// Default identity authority base URL.
pub const DEFAULT_AUTHORITY_URL: &str = "https://moltbook.zae.life/api/v1";

/// Path of the token-issuance endpoint, relative to the authority base URL.
pub const IDENTITY_TOKEN_PATH: &str = "me/identity-token";

/// Environment variable holding the long-lived authority API key.
pub const API_KEY_ENV: &str = "MOLTBOOK_API_KEY";

/// Lifetime assumed for a freshly issued credential.
///
/// The authority's actual token TTL is not consulted; callers trust a token
/// for exactly this long after issuance.
pub const DEFAULT_CREDENTIAL_LIFETIME: Duration = Duration::from_secs(3600);

/// Safety margin before expiry within which a credential is refreshed early.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Default deadline for a single payment execution.
pub const DEFAULT_PAYMENT_DEADLINE: Duration = Duration::from_secs(30);

/// Default `origin` tag stamped on emitted posts.
pub const DEFAULT_EMITTER_ORIGIN: &str = "tollgate";
