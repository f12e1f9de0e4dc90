use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::common_models::did::DidValue;

/// Authenticated caller, as established from a validated self-issued ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenContext {
    /// DID of the caller, the token's `sub`.
    pub subject: DidValue,
    pub issuer: DidValue,
    pub audience: Vec<String>,
    /// Scopes granted by the embedded access token, if it could be read.
    pub scopes: Vec<String>,
    /// The `token` claim.
    pub access_token: Option<String>,
    pub expires_at: Option<OffsetDateTime>,
}

/// Custom claims of a self-issued ID token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfIssuedClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Custom claims of an access token. `scope` is read leniently, see
/// [`parse_scopes`](super::imp::access_token::parse_scopes).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<serde_json::Value>,
}

/// Readable parts of an access token; the signature is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub issuer: String,
    pub subject: Option<String>,
    pub scopes: Vec<String>,
}
