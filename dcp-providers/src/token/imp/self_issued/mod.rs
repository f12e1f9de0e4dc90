//! Self-issued ID tokens signed with the caller's DID authentication key.

use std::sync::Arc;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::access_token::parse_access_token;
use crate::{
    common_models::did::{DidValue, KeyRole},
    credential_formatter::{
        error::FormatterError,
        imp::{
            common::truncate_to_seconds,
            jwt::{model::JwtClaims, Jwt},
            SIGNING_ALGORITHM,
        },
        model::AuthenticationFn,
    },
    did::provider::DidMethodProvider,
    key_algorithm::provider::KeyAlgorithmProvider,
    token::{
        error::TokenError,
        model::{SelfIssuedClaims, TokenContext},
        TokenValidator,
    },
    util::key_verification::KeyVerification,
};


pub struct SelfIssuedIdTokenValidator {
    did_method_provider: Arc<dyn DidMethodProvider>,
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    /// Allowed clock skew in seconds.
    leeway: u64,
}

impl SelfIssuedIdTokenValidator {
    pub fn new(
        did_method_provider: Arc<dyn DidMethodProvider>,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
        leeway: u64,
    ) -> Self {
        Self {
            did_method_provider,
            key_algorithm_provider,
            leeway,
        }
    }
}

#[async_trait]
impl TokenValidator for SelfIssuedIdTokenValidator {
    async fn validate(
        &self,
        token: &str,
        expected_audience: &str,
    ) -> Result<TokenContext, TokenError> {
        let payload = Jwt::<SelfIssuedClaims>::decompose_token(token)
            .map_err(|e| TokenError::Malformed(e.to_string()))?
            .payload;

        let issuer = payload.issuer.ok_or(TokenError::MissingClaim("iss"))?;
        let subject = payload.subject.ok_or(TokenError::MissingClaim("sub"))?;
        if issuer != subject {
            return Err(TokenError::IssuerSubjectMismatch { issuer, subject });
        }

        let audience = payload.audience.unwrap_or_default();
        if !audience.iter().any(|aud| aud == expected_audience) {
            return Err(TokenError::AudienceMismatch {
                expected: expected_audience.to_owned(),
            });
        }

        let expires_at = payload.expires_at.ok_or(TokenError::MissingClaim("exp"))?;
        let leeway = Duration::seconds(self.leeway as i64);
        if expires_at + leeway < OffsetDateTime::now_utc() {
            return Err(TokenError::Expired);
        }

        let verification = KeyVerification {
            did_method_provider: self.did_method_provider.clone(),
            key_algorithm_provider: self.key_algorithm_provider.clone(),
            key_role: KeyRole::Authentication,
        };
        Jwt::<SelfIssuedClaims>::build_from_token(token, Some(Box::new(verification)))
            .await
            .map_err(|e| match e {
                FormatterError::Verification(reason) => TokenError::InvalidSignature(reason),
                other => TokenError::Malformed(other.to_string()),
            })?;

        let access_token = payload
            .custom
            .token
            .filter(|access_token| !access_token.trim().is_empty());
        let scopes = access_token
            .as_deref()
            .and_then(|access_token| parse_access_token(access_token).ok())
            .map(|access_token| access_token.scopes)
            .unwrap_or_default();

        tracing::debug!(subject = %subject, "self-issued token validated");

        Ok(TokenContext {
            subject: DidValue::from(subject),
            issuer: DidValue::from(issuer),
            audience,
            scopes,
            access_token,
            expires_at: Some(expires_at),
        })
    }
}

/// Creates a self-issued ID token for `did` addressed to `audience`, optionally carrying
/// an access token in the `token` claim.
pub async fn create_self_issued_token(
    did: &DidValue,
    audience: &str,
    access_token: Option<String>,
    valid_for: Duration,
    auth_fn: AuthenticationFn,
) -> Result<String, TokenError> {
    let now = truncate_to_seconds(OffsetDateTime::now_utc());

    let payload = JwtClaims {
        issued_at: Some(now),
        expires_at: now.checked_add(valid_for),
        issuer: Some(did.to_string()),
        subject: Some(did.to_string()),
        audience: Some(vec![audience.to_owned()]),
        jwt_id: Some(Uuid::new_v4().to_string()),
        custom: SelfIssuedClaims {
            token: access_token,
        },
        ..Default::default()
    };

    let key_id = auth_fn.get_key_id();
    Jwt::new("JWT".to_owned(), SIGNING_ALGORITHM.to_owned(), key_id, payload)
        .tokenize(auth_fn)
        .await
        .map_err(|e| TokenError::Signing(e.to_string()))
}
