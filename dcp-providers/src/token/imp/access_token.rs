//! Access tokens carried inside self-issued ID tokens.
//!
//! The receiver of an access token only relays it, so it is read without signature
//! verification; the credential service that minted it verifies it when it comes back.

use serde_json::Value;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    credential_formatter::{
        imp::{
            common::truncate_to_seconds,
            jwt::{model::JwtClaims, Jwt},
            SIGNING_ALGORITHM,
        },
        model::AuthenticationFn,
    },
    token::{
        error::TokenError,
        model::{AccessToken, AccessTokenClaims},
    },
};

#[cfg(test)]
mod test;

/// Reads `iss` and `scope` from an access token. `iss` must be present and non-blank.
pub fn parse_access_token(token: &str) -> Result<AccessToken, TokenError> {
    let decomposed = Jwt::<AccessTokenClaims>::decompose_token(token)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    let payload = decomposed.payload;

    let issuer = payload
        .issuer
        .filter(|issuer| !issuer.trim().is_empty())
        .ok_or(TokenError::MissingClaim("iss"))?;

    Ok(AccessToken {
        issuer,
        subject: payload.subject,
        scopes: parse_scopes(payload.custom.scope.as_ref()),
    })
}

/// `scope` as a list of strings, a space-separated string, or absent. Any other shape
/// yields no scopes.
pub fn parse_scopes(scope: Option<&Value>) -> Vec<String> {
    match scope {
        None | Some(Value::Null) => vec![],
        Some(Value::String(scopes)) => scopes.split_whitespace().map(str::to_owned).collect(),
        Some(Value::Array(scopes)) => scopes
            .iter()
            .filter_map(|scope| match scope {
                Value::String(scope) if !scope.trim().is_empty() => Some(scope.trim().to_owned()),
                other => {
                    tracing::warn!(scope = %other, "ignoring non-string scope entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::warn!(scope = %other, "unsupported scope claim shape, no scopes granted");
            vec![]
        }
    }
}

/// Mints an access token granting `scopes` to `subject`, redeemable at `audience`.
pub async fn create_access_token(
    issuer: &str,
    subject: &str,
    audience: &str,
    scopes: &[String],
    valid_for: Duration,
    auth_fn: AuthenticationFn,
) -> Result<String, TokenError> {
    let now = truncate_to_seconds(OffsetDateTime::now_utc());

    let payload = JwtClaims {
        issued_at: Some(now),
        expires_at: now.checked_add(valid_for),
        issuer: Some(issuer.to_owned()),
        subject: Some(subject.to_owned()),
        audience: Some(vec![audience.to_owned()]),
        jwt_id: Some(Uuid::new_v4().to_string()),
        custom: AccessTokenClaims {
            scope: Some(Value::String(scopes.join(" "))),
        },
        ..Default::default()
    };

    let key_id = auth_fn.get_key_id();
    Jwt::new("JWT".to_owned(), SIGNING_ALGORITHM.to_owned(), key_id, payload)
        .tokenize(auth_fn)
        .await
        .map_err(|e| TokenError::Signing(e.to_string()))
}
