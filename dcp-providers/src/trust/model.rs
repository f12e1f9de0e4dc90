use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::common_models::{did::DidValue, ValidationError};

/// A holder's consent to present credentials of the `granted` types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    pub id: String,
    pub holder_did: DidValue,
    pub requested: Vec<String>,
    pub granted: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl ConsentRecord {
    pub fn builder(holder_did: DidValue) -> ConsentRecordBuilder {
        ConsentRecordBuilder {
            holder_did,
            requested: vec![],
            granted: vec![],
            issued_at: None,
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Every one of `credential_types` is granted.
    pub fn covers(&self, credential_types: &[String]) -> bool {
        credential_types
            .iter()
            .all(|credential_type| self.granted.contains(credential_type))
    }
}

pub struct ConsentRecordBuilder {
    holder_did: DidValue,
    requested: Vec<String>,
    granted: Vec<String>,
    issued_at: Option<OffsetDateTime>,
    expires_at: Option<OffsetDateTime>,
}

impl ConsentRecordBuilder {
    pub fn requested(mut self, requested: Vec<String>) -> Self {
        self.requested = requested;
        self
    }

    pub fn granted(mut self, granted: Vec<String>) -> Self {
        self.granted = granted;
        self
    }

    pub fn issued_at(mut self, issued_at: OffsetDateTime) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn expires_at(mut self, expires_at: OffsetDateTime) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn build(self) -> Result<ConsentRecord, ValidationError> {
        if self.requested.is_empty() {
            return Err(ValidationError(
                "consent must request at least one credential type".to_owned(),
            ));
        }

        if let Some(not_requested) = self
            .granted
            .iter()
            .find(|granted| !self.requested.contains(granted))
        {
            return Err(ValidationError(format!(
                "granted type `{not_requested}` was not requested"
            )));
        }

        let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
        if self.expires_at.is_some_and(|expires_at| expires_at <= issued_at) {
            return Err(ValidationError("consent expires before it is issued".to_owned()));
        }

        Ok(ConsentRecord {
            id: Uuid::new_v4().to_string(),
            holder_did: self.holder_did,
            requested: self.requested,
            granted: self.granted,
            issued_at,
            expires_at: self.expires_at,
        })
    }
}
