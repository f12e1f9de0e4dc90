//! VC Data Model 1.1 credentials as JWT, everything nested under the `vc` claim.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use self::model::{Vc11Content, Vc11Payload, Vc11Proof};
use super::{
    common::{credential_subject, credential_types, truncate_to_seconds, Issuer},
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


pub mod model;

const PROOF_TYPE: &str = "JsonWebSignature2020";

pub struct Vc11JwtFormatter {
    params: Params,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub leeway: u64,
}

impl Vc11JwtFormatter {
    pub fn new(params: Params) -> Self {
        Self { params }
    }
}

#[async_trait]
impl CredentialFormatter for Vc11JwtFormatter {
    fn get_profile(&self) -> ProfileId {
        ProfileId::Vc11Sl2021Jwt
    }

    async fn generate_jwt(
        &self,
        credential: CredentialData,
        auth_fn: AuthenticationFn,
    ) -> Result<String, FormatterError> {
        let issued_at = truncate_to_seconds(credential.issuance_date);
        let expires_at = issued_at.checked_add(credential.valid_for);
        let credential_id = format!("urn:uuid:{}", Uuid::new_v4());
        let issuer = credential.issuer_did.to_string();
        let holder = credential.holder_did.to_string();

        let key_id = auth_fn.get_key_id();
        let verification_method = key_id
            .clone()
            .unwrap_or_else(|| credential.issuer_did.key_reference("key-1"));

        let vc = Vc11Content {
            context: vec![Context::CredentialsV1.to_string()],
            id: Some(credential_id.clone()),
            r#type: credential_types(&credential.credential_type),
            credential_subject: credential_subject(&holder, credential.claims),
            issuer: Issuer::Url(issuer.clone()),
            issuance_date: Some(issued_at),
            expiration_date: expires_at,
            credential_status: credential
                .status
                .iter()
                .map(|coordinates| CredentialStatus::revocation_entry(self.get_profile(), coordinates))
                .collect(),
            credential_schema: credential.schema,
            proof: Some(Vc11Proof {
                r#type: PROOF_TYPE.to_owned(),
                created: issued_at,
                verification_method,
                proof_purpose: "assertionMethod".to_owned(),
            }),
        };

        let payload = JwtClaims {
            issued_at: Some(issued_at),
            expires_at,
            not_before: None,
            issuer: Some(issuer),
            subject: Some(holder),
            audience: None,
            jwt_id: Some(credential_id),
            custom: Vc11Payload { vc },
        };

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
        let jwt: Jwt<Vc11Payload> = Jwt::build_from_token(token, Some(verification)).await?;

        to_detail_credential(jwt)
    }

    async fn extract_credential_unverified(
        &self,
        token: &str,
    ) -> Result<DetailCredential, FormatterError> {
        let jwt: Jwt<Vc11Payload> = Jwt::build_from_token(token, None).await?;

        to_detail_credential(jwt)
    }

    fn get_leeway(&self) -> u64 {
        self.params.leeway
    }
}

fn to_detail_credential(jwt: Jwt<Vc11Payload>) -> Result<DetailCredential, FormatterError> {
    let payload = jwt.payload;
    let credential = serde_json::to_value(&payload.custom.vc)
        .map_err(|e| FormatterError::InvalidClaims(e.to_string()))?;
    let Vc11Content {
        id,
        r#type,
        credential_subject,
        issuer,
        issuance_date,
        expiration_date,
        credential_status,
        credential_schema,
        ..
    } = payload.custom.vc;

    Ok(DetailCredential {
        id: id.or(payload.jwt_id),
        profile: ProfileId::Vc11Sl2021Jwt,
        issuer_did: Some(DidValue::from(issuer.issuer().to_owned())),
        subject: payload.subject.map(DidValue::from),
        types: r#type,
        valid_from: issuance_date.or(payload.issued_at),
        valid_until: expiration_date.or(payload.expires_at),
        claims: credential_subject,
        status: credential_status,
        credential_schema,
        credential,
    })
}
