use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use subtle::ConstantTimeEq;

use super::AppState;
use crate::service::error::ServiceError;

/// Token from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ServiceError::AuthenticationFailure("missing bearer token".to_owned()))?
            .to_str()
            .map_err(|_| {
                ServiceError::AuthenticationFailure("malformed authorization header".to_owned())
            })?;

        header
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map(|token| Self(token.to_owned()))
            .ok_or_else(|| ServiceError::AuthenticationFailure("missing bearer token".to_owned()))
    }
}

/// Operator of this connector, authenticated by the configured admin token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCaller;

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(provided) = BearerToken::from_request_parts(parts, state).await?;
        let expected = state.admin_token.as_ref().ok_or_else(|| {
            ServiceError::AuthenticationFailure("administration is disabled".to_owned())
        })?;

        if token_eq(&provided, &expected.0) {
            Ok(Self)
        } else {
            tracing::warn!("rejected administration request with a wrong token");
            Err(ServiceError::AuthenticationFailure(
                "invalid admin token".to_owned(),
            ))
        }
    }
}

fn token_eq(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len() && bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}
