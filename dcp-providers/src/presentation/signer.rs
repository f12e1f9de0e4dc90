//! Signs presentations as a JWT carrying a `vp` claim, or as a JSON-LD document with a
//! detached-payload JWS proof.

use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{
    error::PresentationError,
    model::{PresentationFormat, VerifiablePresentation, VERIFIABLE_PRESENTATION_TYPE},
};
use crate::{
    common_models::did::DidValue,
    credential_formatter::{
        imp::{
            common::now_in_seconds,
            jwt::{model::JwtClaims, Jwt},
            SIGNING_ALGORITHM,
        },
        model::{AuthenticationFn, VerificationFn},
    },
};

#[cfg(test)]
mod test;

pub const PROOF_TYPE: &str = "JsonWebSignature2020";
const PROOF_PURPOSE: &str = "authentication";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpClaims {
    pub vp: VpContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpContent {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub r#type: Vec<String>,
    #[serde(default)]
    pub verifiable_credential: Vec<Value>,
}

/// Detached JWS header: the payload is signed as-is, unencoded.
#[derive(Debug, Serialize, Deserialize)]
struct DetachedJwsHeader {
    alg: String,
    b64: bool,
    crit: Vec<String>,
}

#[derive(Default)]
pub struct VerifiablePresentationSigner;

impl VerifiablePresentationSigner {
    /// `format` is `jwt` or `json-ld`. A JWT comes back as a JSON string, a JSON-LD
    /// presentation as the document with its proof.
    pub async fn sign(
        &self,
        presentation: &VerifiablePresentation,
        format: &str,
        auth_fn: AuthenticationFn,
    ) -> Result<Value, PresentationError> {
        match PresentationFormat::parse(format) {
            Some(PresentationFormat::Jwt) => self.sign_jwt(presentation, auth_fn).await,
            Some(PresentationFormat::JsonLd) => self.sign_json_ld(presentation, auth_fn).await,
            None => Err(PresentationError::UnsupportedFormat(format.to_owned())),
        }
    }

    async fn sign_jwt(
        &self,
        presentation: &VerifiablePresentation,
        auth_fn: AuthenticationFn,
    ) -> Result<Value, PresentationError> {
        let holder = presentation.holder_did.to_string();
        let verifiable_credential = if presentation.credentials.is_empty() {
            presentation
                .credential_ids
                .iter()
                .cloned()
                .map(Value::String)
                .collect()
        } else {
            presentation.credentials.clone()
        };

        let payload = JwtClaims {
            issued_at: Some(now_in_seconds()),
            expires_at: None,
            not_before: None,
            issuer: Some(holder.to_owned()),
            subject: Some(holder),
            audience: None,
            jwt_id: Some(presentation.id.to_owned()),
            custom: VpClaims {
                vp: VpContent {
                    context: vec![presentation.profile_id.base_context().to_string()],
                    r#type: vec![VERIFIABLE_PRESENTATION_TYPE.to_owned()],
                    verifiable_credential,
                },
            },
        };

        let key_id = auth_fn.get_key_id();
        let token = Jwt::new("JWT".to_owned(), SIGNING_ALGORITHM.to_owned(), key_id, payload)
            .tokenize(auth_fn)
            .await
            .map_err(|e| PresentationError::Signing(e.to_string()))?;

        Ok(Value::String(token))
    }

    async fn sign_json_ld(
        &self,
        presentation: &VerifiablePresentation,
        auth_fn: AuthenticationFn,
    ) -> Result<Value, PresentationError> {
        let mut document = json!({
            "@context": [presentation.profile_id.base_context().to_string()],
            "id": presentation.id,
            "type": [VERIFIABLE_PRESENTATION_TYPE],
            "verifiableCredential": presentation.credential_ids,
            "holder": presentation.holder_did,
        });

        let payload = serde_json::to_string(&document)
            .map_err(|e| PresentationError::Signing(e.to_string()))?;
        let header = encode_detached_header()?;

        let signature = auth_fn
            .sign(format!("{header}.{payload}").as_bytes())
            .await
            .map_err(|e| PresentationError::Signing(e.to_string()))?;
        let signature = Base64UrlSafeNoPadding::encode_to_string(signature)
            .map_err(|e| PresentationError::Signing(e.to_string()))?;

        let verification_method = presentation
            .holder_did
            .key_reference(&auth_fn.get_key_id().unwrap_or_default());
        let created = now_in_seconds()
            .format(&Rfc3339)
            .map_err(|e| PresentationError::Signing(e.to_string()))?;

        document["proof"] = json!({
            "type": PROOF_TYPE,
            "created": created,
            "verificationMethod": verification_method,
            "proofPurpose": PROOF_PURPOSE,
            "jws": format!("{header}..{signature}"),
        });

        Ok(document)
    }
}

/// A received presentation, reduced to what validation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedPresentation {
    pub id: Option<String>,
    pub holder: Option<DidValue>,
    pub credentials: Vec<Value>,
    pub issued_at: Option<OffsetDateTime>,
}

/// Reads a presentation in either format and checks its signature with `verification`.
pub async fn verify_presentation(
    presentation: &Value,
    verification: VerificationFn,
) -> Result<ReceivedPresentation, PresentationError> {
    match presentation {
        Value::String(token) => {
            let jwt = Jwt::<VpClaims>::build_from_token(token, Some(verification)).await?;

            Ok(ReceivedPresentation {
                id: jwt.payload.jwt_id,
                holder: jwt.payload.issuer.map(DidValue::from),
                credentials: jwt.payload.custom.vp.verifiable_credential,
                issued_at: jwt.payload.issued_at,
            })
        }
        Value::Object(_) => verify_json_ld(presentation, verification).await,
        other => Err(PresentationError::Invalid(format!(
            "expected a JWT or a JSON document, got `{other}`"
        ))),
    }
}

async fn verify_json_ld(
    presentation: &Value,
    verification: VerificationFn,
) -> Result<ReceivedPresentation, PresentationError> {
    let invalid = |reason: &str| PresentationError::Invalid(reason.to_owned());

    let mut document = presentation.clone();
    let proof = document
        .as_object_mut()
        .and_then(|object| object.remove("proof"))
        .ok_or_else(|| invalid("missing proof"))?;

    let jws = proof
        .get("jws")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing proof.jws"))?;
    let (header, signature) = jws
        .split_once("..")
        .ok_or_else(|| invalid("proof.jws is not a detached JWS"))?;

    let decoded_header = Base64UrlSafeNoPadding::decode_to_vec(header, None)
        .map_err(|e| PresentationError::Invalid(e.to_string()))?;
    let decoded_header: DetachedJwsHeader = serde_json::from_slice(&decoded_header)
        .map_err(|e| PresentationError::Invalid(e.to_string()))?;
    if decoded_header.b64 {
        return Err(invalid("proof.jws must sign the unencoded payload"));
    }

    let signature = Base64UrlSafeNoPadding::decode_to_vec(signature, None)
        .map_err(|e| PresentationError::Invalid(e.to_string()))?;

    let holder = document
        .get("holder")
        .and_then(Value::as_str)
        .map(DidValue::from);
    let payload =
        serde_json::to_string(&document).map_err(|e| PresentationError::Invalid(e.to_string()))?;

    verification
        .verify(
            holder.clone(),
            proof.get("verificationMethod").and_then(Value::as_str),
            &decoded_header.alg,
            format!("{header}.{payload}").as_bytes(),
            &signature,
        )
        .await
        .map_err(|e| PresentationError::Invalid(format!("proof verification failed: {e}")))?;

    let issued_at = proof
        .get("created")
        .and_then(Value::as_str)
        .and_then(|created| OffsetDateTime::parse(created, &Rfc3339).ok());

    Ok(ReceivedPresentation {
        id: document.get("id").and_then(Value::as_str).map(str::to_owned),
        holder,
        credentials: document
            .get("verifiableCredential")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        issued_at,
    })
}

fn encode_detached_header() -> Result<String, PresentationError> {
    let header = serde_json::to_string(&DetachedJwsHeader {
        alg: SIGNING_ALGORITHM.to_owned(),
        b64: false,
        crit: vec!["b64".to_owned()],
    })
    .map_err(|e| PresentationError::Signing(e.to_string()))?;

    Base64UrlSafeNoPadding::encode_to_string(header)
        .map_err(|e| PresentationError::Signing(e.to_string()))
}
