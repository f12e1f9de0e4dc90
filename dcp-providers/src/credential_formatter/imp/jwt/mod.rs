//! Compact JWS tokens with a typed custom payload.

use std::fmt::Debug;

use async_trait::async_trait;
use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use serde::{de::DeserializeOwned, Serialize};

use self::model::{DecomposedToken, JwsHeader, JwtClaims};
use crate::{
    common_models::did::DidValue,
    credential_formatter::{
        error::FormatterError,
        model::{AuthenticationFn, TokenVerifier},
    },
    crypto::SignerError,
};

#[cfg(test)]
mod test;

pub mod model;

#[async_trait]
impl TokenVerifier for Box<dyn TokenVerifier> {
    async fn verify<'a>(
        &self,
        issuer_did_value: Option<DidValue>,
        issuer_key_id: Option<&'a str>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError> {
        self.as_ref()
            .verify(issuer_did_value, issuer_key_id, algorithm, token, signature)
            .await
    }
}

#[derive(Debug)]
pub struct Jwt<Payload: Serialize + DeserializeOwned + Debug> {
    pub header: JwsHeader,
    pub payload: JwtClaims<Payload>,
}

impl<Payload: Serialize + DeserializeOwned + Debug> Jwt<Payload> {
    pub fn new(
        token_type: String,
        algorithm: String,
        key_id: Option<String>,
        payload: JwtClaims<Payload>,
    ) -> Jwt<Payload> {
        let header = JwsHeader {
            signature_type: Some(token_type),
            algorithm,
            key_id,
        };

        Jwt { header, payload }
    }

    /// Decodes `token`; when `verification` is given the signature is checked against the
    /// `iss` DID and `kid` header first.
    pub async fn build_from_token(
        token: &str,
        verification: Option<Box<dyn TokenVerifier>>,
    ) -> Result<Jwt<Payload>, FormatterError> {
        let decomposed = Self::decompose_token(token)?;

        if let Some(verification) = verification {
            let signing_input = signing_input(&decomposed.header_json, &decomposed.payload_json)?;
            let issuer = decomposed.payload.issuer.as_deref().map(DidValue::from);

            verification
                .verify(
                    issuer,
                    decomposed.header.key_id.as_deref(),
                    &decomposed.header.algorithm,
                    signing_input.as_bytes(),
                    &decomposed.signature,
                )
                .await
                .map_err(|e| FormatterError::Verification(e.to_string()))?;
        }

        Ok(Jwt {
            header: decomposed.header,
            payload: decomposed.payload,
        })
    }

    pub async fn tokenize(&self, auth_fn: AuthenticationFn) -> Result<String, FormatterError> {
        let header_json = to_json(&self.header)?;
        let payload_json = to_json(&self.payload)?;
        let mut token = signing_input(&header_json, &payload_json)?;

        let signature = auth_fn
            .sign(token.as_bytes())
            .await
            .map_err(|e| FormatterError::Signing(e.to_string()))?;

        if !signature.is_empty() {
            token.push('.');
            token.push_str(&encode(&signature)?);
        }

        Ok(token)
    }

    /// Splits and decodes the token without any signature check. The signature part may be
    /// empty or missing.
    pub fn decompose_token(token: &str) -> Result<DecomposedToken<Payload>, FormatterError> {
        let token = token.trim_matches(|c: char| c == '.' || c.is_whitespace());
        let mut parts = token.splitn(3, '.');

        let (Some(header), Some(payload)) = (parts.next(), parts.next()) else {
            return Err(FormatterError::MalformedToken(
                "expected header and payload".to_owned(),
            ));
        };

        let header_json = decode_json_part(header)?;
        let payload_json = decode_json_part(payload)?;
        let signature = decode(parts.next().unwrap_or_default())?;

        Ok(DecomposedToken {
            header: from_json(&header_json)?,
            payload: from_json(&payload_json)?,
            header_json,
            payload_json,
            signature,
        })
    }
}

fn signing_input(header_json: &str, payload_json: &str) -> Result<String, FormatterError> {
    Ok(format!(
        "{}.{}",
        encode(header_json.as_bytes())?,
        encode(payload_json.as_bytes())?
    ))
}

fn encode(bytes: &[u8]) -> Result<String, FormatterError> {
    Base64UrlSafeNoPadding::encode_to_string(bytes)
        .map_err(|e| FormatterError::Encoding(e.to_string()))
}

fn decode(part: &str) -> Result<Vec<u8>, FormatterError> {
    Base64UrlSafeNoPadding::decode_to_vec(part, None)
        .map_err(|e| FormatterError::MalformedToken(e.to_string()))
}

fn decode_json_part(part: &str) -> Result<String, FormatterError> {
    String::from_utf8(decode(part)?).map_err(|e| FormatterError::MalformedToken(e.to_string()))
}

fn to_json(value: &impl Serialize) -> Result<String, FormatterError> {
    serde_json::to_string(value).map_err(|e| FormatterError::Encoding(e.to_string()))
}

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, FormatterError> {
    serde_json::from_str(json).map_err(|e| FormatterError::MalformedToken(e.to_string()))
}
