//! Maps [`ServiceError`] onto HTTP responses with a `{"error":{"code","message"}}` body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::service::{
    error::ServiceError,
    verifier_service::{VerifierError, VerifierStep},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServiceError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::AuthenticationFailure(_) => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILURE"),
            Self::AuthorizationFailure(_) => (StatusCode::FORBIDDEN, "AUTHORIZATION_FAILURE"),
            Self::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            Self::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            Self::ValidationFailure(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILURE"),
            Self::RevocationFetchFailure(_) => (StatusCode::BAD_GATEWAY, "REVOCATION_FETCH_FAILURE"),
            Self::RevocationFormatFailure(_) => {
                (StatusCode::BAD_GATEWAY, "REVOCATION_FORMAT_FAILURE")
            }
            Self::DidResolutionFailure(_) => (StatusCode::BAD_GATEWAY, "DID_RESOLUTION_FAILURE"),
            Self::UnsupportedFormat(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UNSUPPORTED_FORMAT"),
            Self::Verifier(error) => verifier_status_and_code(error),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

fn verifier_status_and_code(error: &VerifierError) -> (StatusCode, &'static str) {
    match error.step {
        VerifierStep::TokenValidation => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILURE"),
        VerifierStep::AccessTokenParsing => (StatusCode::BAD_REQUEST, "VALIDATION_FAILURE"),
        VerifierStep::DidResolution => (StatusCode::BAD_GATEWAY, "DID_RESOLUTION_FAILURE"),
        VerifierStep::PresentationQuery => (StatusCode::BAD_GATEWAY, "PRESENTATION_QUERY_FAILURE"),
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_owned()
        } else {
            tracing::debug!(error = %self, %status, "request refused");
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_owned(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Unwraps a JSON body, turning a rejection into a validation failure.
pub fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ServiceError::ValidationFailure(rejection.body_text()))
}
