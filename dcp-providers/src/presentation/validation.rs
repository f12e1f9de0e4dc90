//! Validation of presentation responses received from a holder.
//!
//! Problems are collected into a [`ValidationReport`] rather than returned as errors, so a
//! verifier sees every reason a response was refused.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use strum::Display;
use time::OffsetDateTime;

use super::{
    model::PresentationResponseMessage,
    signer::{verify_presentation, ReceivedPresentation},
};
use crate::{
    common_models::did::{DidValue, KeyRole},
    credential_formatter::{
        model::DetailCredential, profile::ProfileId, provider::CredentialFormatterProvider,
    },
    did::provider::DidMethodProvider,
    key_algorithm::provider::KeyAlgorithmProvider,
    revocation::RevocationService,
    token::model::TokenContext,
    trust::{issuer_trust::IssuerTrustService, schema_registry::SchemaRegistryService},
    util::key_verification::KeyVerification,
};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    EmptyPresentation,
    InvalidPresentation,
    HolderMismatch,
    CredentialSubjectMismatch,
    MalformedCredential,
    UnverifiedCredential,
    CredentialExpired,
    UntrustedIssuer,
    UnknownSchema,
    CredentialRevoked,
    RevocationCheckFailed,
    MissingCredentialType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub code: ValidationCode,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub accepted_credential_types: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        !has_errors(&self.errors)
    }

    pub fn has(&self, code: ValidationCode) -> bool {
        self.errors.iter().any(|error| error.code == code)
    }

    fn error(&mut self, code: ValidationCode, message: impl Into<String>) {
        self.push(code, message, Severity::Error);
    }

    fn warning(&mut self, code: ValidationCode, message: impl Into<String>) {
        self.push(code, message, Severity::Warning);
    }

    fn push(&mut self, code: ValidationCode, message: impl Into<String>, severity: Severity) {
        self.errors.push(ValidationError {
            code,
            message: message.into(),
            severity,
        });
    }

    fn accept(&mut self, credential_type: &str) {
        if !self
            .accepted_credential_types
            .iter()
            .any(|accepted| accepted == credential_type)
        {
            self.accepted_credential_types
                .push(credential_type.to_owned());
        }
    }
}

pub struct PresentationValidationService {
    formatter_provider: Arc<dyn CredentialFormatterProvider>,
    did_method_provider: Arc<dyn DidMethodProvider>,
    key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    issuer_trust: Arc<IssuerTrustService>,
    schema_registry: Arc<SchemaRegistryService>,
    revocation: Arc<dyn RevocationService>,
}

impl PresentationValidationService {
    pub fn new(
        formatter_provider: Arc<dyn CredentialFormatterProvider>,
        did_method_provider: Arc<dyn DidMethodProvider>,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
        issuer_trust: Arc<IssuerTrustService>,
        schema_registry: Arc<SchemaRegistryService>,
        revocation: Arc<dyn RevocationService>,
    ) -> Self {
        Self {
            formatter_provider,
            did_method_provider,
            key_algorithm_provider,
            issuer_trust,
            schema_registry,
            revocation,
        }
    }

    /// Checks every presentation in `response` against the authenticated holder and reports
    /// which of `required_types` were not satisfied by an acceptable credential.
    pub async fn validate(
        &self,
        response: &PresentationResponseMessage,
        required_types: &[String],
        context: &TokenContext,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();
        let now = OffsetDateTime::now_utc();

        if response.presentation.is_empty() {
            report.error(
                ValidationCode::EmptyPresentation,
                "the response contains no presentation",
            );
        }

        for presentation in &response.presentation {
            let received = match verify_presentation(
                presentation,
                Box::new(self.verification(KeyRole::Authentication)),
            )
            .await
            {
                Ok(received) => received,
                Err(error) => {
                    report.error(ValidationCode::InvalidPresentation, error.to_string());
                    continue;
                }
            };

            if received.holder.as_ref() != Some(&context.subject) {
                report.error(
                    ValidationCode::HolderMismatch,
                    format!(
                        "presentation holder `{}` is not the authenticated `{}`",
                        received
                            .holder
                            .as_ref()
                            .map(DidValue::as_str)
                            .unwrap_or_default(),
                        context.subject
                    ),
                );
                continue;
            }

            self.validate_credentials(&received, now, &mut report).await;
        }

        for required in required_types {
            if !report
                .accepted_credential_types
                .iter()
                .any(|accepted| accepted == required)
            {
                report.error(
                    ValidationCode::MissingCredentialType,
                    format!("no acceptable `{required}` credential was presented"),
                );
            }
        }

        tracing::info!(
            holder = %context.subject,
            valid = report.is_valid(),
            findings = report.errors.len(),
            "presentation response validated"
        );
        report
    }

    async fn validate_credentials(
        &self,
        presentation: &ReceivedPresentation,
        now: OffsetDateTime,
        report: &mut ValidationReport,
    ) {
        for credential in &presentation.credentials {
            let Some(token) = credential.as_str().filter(|token| is_compact_jwt(token)) else {
                report.warning(
                    ValidationCode::UnverifiedCredential,
                    format!("credential `{}` is not a signed JWT", describe(credential)),
                );
                continue;
            };

            let detail = match self.extract(token).await {
                Ok(detail) => detail,
                Err(reason) => {
                    report.error(ValidationCode::MalformedCredential, reason);
                    continue;
                }
            };

            if self
                .validate_credential(&detail, presentation.holder.as_ref(), now, report)
                .await
            {
                if let Some(credential_type) = detail.credential_type() {
                    report.accept(credential_type);
                }
            }
        }
    }

    /// Returns whether the credential passed without errors. Revocation is only checked for
    /// credentials that pass everything else.
    async fn validate_credential(
        &self,
        detail: &DetailCredential,
        holder: Option<&DidValue>,
        now: OffsetDateTime,
        report: &mut ValidationReport,
    ) -> bool {
        let errors_before = report.errors.len();
        let label = detail.id.as_deref().unwrap_or("<unnamed>");
        let credential_type = detail.credential_type();

        if detail.subject.is_none() || detail.subject.as_ref() != holder {
            report.error(
                ValidationCode::CredentialSubjectMismatch,
                format!(
                    "credential `{label}` was issued to `{}`, not to the presenting holder",
                    detail
                        .subject
                        .as_ref()
                        .map(DidValue::as_str)
                        .unwrap_or_default()
                ),
            );
        }

        let leeway = self
            .formatter_provider
            .get_formatter(detail.profile)
            .map(|formatter| formatter.get_leeway())
            .unwrap_or_default();
        if detail.is_expired(now, leeway) {
            report.error(
                ValidationCode::CredentialExpired,
                format!("credential `{label}` has expired"),
            );
        }

        if !self
            .issuer_trust
            .is_trusted(credential_type, detail.issuer_did.as_ref())
        {
            report.error(
                ValidationCode::UntrustedIssuer,
                format!(
                    "issuer of credential `{label}` is not trusted for `{}`",
                    credential_type.unwrap_or_default()
                ),
            );
        }

        if let Some(schema) = &detail.credential_schema {
            if !self.schema_registry.exists(&schema.id) {
                report.warning(
                    ValidationCode::UnknownSchema,
                    format!("schema `{}` is not registered", schema.id),
                );
            }
        }

        if has_errors(&report.errors[errors_before..]) {
            return false;
        }

        match self.revocation.is_revoked(&detail.credential).await {
            Ok(true) => report.error(
                ValidationCode::CredentialRevoked,
                format!("credential `{label}` has been revoked"),
            ),
            Ok(false) => {}
            Err(error) => {
                tracing::warn!(credential = label, %error, "revocation check failed");
                report.warning(ValidationCode::RevocationCheckFailed, error.to_string());
            }
        }

        !has_errors(&report.errors[errors_before..])
    }

    async fn extract(&self, token: &str) -> Result<DetailCredential, String> {
        let profile = ProfileId::detect_from_token(token).map_err(|e| e.to_string())?;
        let formatter = self
            .formatter_provider
            .get_formatter(profile)
            .ok_or_else(|| format!("no formatter for profile {profile}"))?;

        formatter
            .extract_credential(token, Box::new(self.verification(KeyRole::AssertionMethod)))
            .await
            .map_err(|e| e.to_string())
    }

    fn verification(&self, key_role: KeyRole) -> KeyVerification {
        KeyVerification {
            did_method_provider: self.did_method_provider.clone(),
            key_algorithm_provider: self.key_algorithm_provider.clone(),
            key_role,
        }
    }
}

fn has_errors(errors: &[ValidationError]) -> bool {
    errors.iter().any(|error| error.severity == Severity::Error)
}

fn is_compact_jwt(value: &str) -> bool {
    value.split('.').count() == 3
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn describe(credential: &Value) -> String {
    match credential {
        Value::String(reference) => reference.to_owned(),
        other => other
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<embedded>")
            .to_owned(),
    }
}
