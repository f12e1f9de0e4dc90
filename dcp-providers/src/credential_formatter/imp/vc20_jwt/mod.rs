//! VC Data Model 2.0 credentials as JWT (`vc+ld+jwt`), claims flat at the top level.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use self::model::Vc20Content;
use super::{
    common::{credential_subject, credential_types, truncate_to_seconds, Issuer, IssuerObject},
    jwt::{model::JwtClaims, Jwt},
    SIGNING_ALGORITHM,
};
use crate::{
    common_models::did::DidValue,
    credential_formatter::{
        error::FormatterError,
        model::{
            AuthenticationFn, Context, CredentialData, CredentialStatus, DetailCredential,
            VerificationFn,
        },
        profile::ProfileId,
        CredentialFormatter,
    },
};

#[cfg(test)]
mod test;

pub mod model;

pub struct Vc20JwtFormatter {
    params: Params,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub leeway: u64,
}

impl Vc20JwtFormatter {
    pub fn new(params: Params) -> Self {
        Self { params }
    }
}

#[async_trait]
impl CredentialFormatter for Vc20JwtFormatter {
    fn get_profile(&self) -> ProfileId {
        ProfileId::Vc20BsslJwt
    }

    async fn generate_jwt(
        &self,
        credential: CredentialData,
        auth_fn: AuthenticationFn,
    ) -> Result<String, FormatterError> {
        let issued_at = truncate_to_seconds(credential.issuance_date);
        let expires_at = issued_at.checked_add(credential.valid_for);
        let issuer = credential.issuer_did.to_string();
        let holder = credential.holder_did.to_string();

        let content = Vc20Content {
            context: vec![Context::CredentialsV2.to_string()],
            r#type: credential_types(&credential.credential_type),
            credential_subject: credential_subject(&holder, credential.claims),
            issuer: Issuer::Object(IssuerObject { id: issuer.clone() }),
            valid_from: Some(issued_at),
            valid_until: expires_at,
            credential_status: credential
                .status
                .iter()
                .map(|coordinates| CredentialStatus::revocation_entry(self.get_profile(), coordinates))
                .collect(),
            credential_schema: credential.schema,
        };

        let payload = JwtClaims {
            issued_at: Some(issued_at),
            expires_at,
            not_before: None,
            issuer: Some(issuer),
            subject: Some(holder),
            audience: None,
            jwt_id: Some(format!("urn:uuid:{}", Uuid::new_v4())),
            custom: content,
        };

        let key_id = auth_fn.get_key_id();
        let jwt = Jwt::new(
            self.get_profile().jwt_type().to_owned(),
            SIGNING_ALGORITHM.to_owned(),
            key_id,
            payload,
        );

        jwt.tokenize(auth_fn).await
    }

    async fn extract_credential(
        &self,
        token: &str,
        verification: VerificationFn,
    ) -> Result<DetailCredential, FormatterError> {
        // Build fails if verification fails
        let jwt: Jwt<Vc20Content> = Jwt::build_from_token(token, Some(verification)).await?;

        to_detail_credential(jwt)
    }

    async fn extract_credential_unverified(
        &self,
        token: &str,
    ) -> Result<DetailCredential, FormatterError> {
        let jwt: Jwt<Vc20Content> = Jwt::build_from_token(token, None).await?;

        to_detail_credential(jwt)
    }

    fn get_leeway(&self) -> u64 {
        self.params.leeway
    }
}

fn to_detail_credential(jwt: Jwt<Vc20Content>) -> Result<DetailCredential, FormatterError> {
    let credential = serde_json::to_value(&jwt.payload)
        .map_err(|e| FormatterError::InvalidClaims(e.to_string()))?;

    let payload = jwt.payload;
    let content = payload.custom;

    Ok(DetailCredential {
        id: payload.jwt_id,
        profile: ProfileId::Vc20BsslJwt,
        issuer_did: Some(DidValue::from(content.issuer.issuer().to_owned())),
        subject: payload.subject.map(DidValue::from),
        types: content.r#type,
        valid_from: content.valid_from.or(payload.issued_at),
        valid_until: content.valid_until.or(payload.expires_at),
        claims: content.credential_subject,
        status: content.credential_status,
        credential_schema: content.credential_schema,
        credential,
    })
}
