use std::collections::HashMap;

use time::OffsetDateTime;

use crate::credential_formatter::model::{CredentialSubject, VERIFIABLE_CREDENTIAL_TYPE};

/// Current time without the sub-second part, so RFC 3339 dates stay short.
pub(crate) fn now_in_seconds() -> OffsetDateTime {
    truncate_to_seconds(OffsetDateTime::now_utc())
}

pub(crate) fn truncate_to_seconds(value: OffsetDateTime) -> OffsetDateTime {
    value - time::Duration::nanoseconds(value.nanosecond() as i64)
}

pub(crate) fn credential_types(credential_type: &str) -> Vec<String> {
    vec![
        VERIFIABLE_CREDENTIAL_TYPE.to_owned(),
        credential_type.to_owned(),
    ]
}

/// `credentialSubject` with `id` set to the holder DID; an `id` among the claims is replaced.
pub(crate) fn credential_subject(
    holder_did: &str,
    claims: serde_json::Map<String, serde_json::Value>,
) -> CredentialSubject {
    let mut values: HashMap<String, serde_json::Value> = claims.into_iter().collect();
    values.insert("id".to_owned(), serde_json::Value::String(holder_did.to_owned()));

    CredentialSubject { values }
}

#[cfg(any(test, feature = "mock"))]
pub struct MockAuth<F: Fn(&[u8]) -> Vec<u8> + Send + Sync>(pub F);

#[cfg(any(test, feature = "mock"))]
pub use crate::credential_formatter::model::SignatureProvider;

#[cfg(any(test, feature = "mock"))]
pub use crate::crypto::SignerError;

#[cfg(any(test, feature = "mock"))]
#[async_trait::async_trait]
impl<F: Fn(&[u8]) -> Vec<u8> + Send + Sync> SignatureProvider for MockAuth<F> {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        Ok(self.0(message))
    }
    fn get_key_id(&self) -> Option<String> {
        Some("did:web:issuer.example#key-1".to_owned())
    }
    fn get_public_key(&self) -> Vec<u8> {
        vec![]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Issuer {
    Object(IssuerObject),
    Url(String),
}

impl Issuer {
    pub fn issuer(&self) -> &str {
        match self {
            Issuer::Object(object) => &object.id,
            Issuer::Url(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssuerObject {
    pub id: String,
}
