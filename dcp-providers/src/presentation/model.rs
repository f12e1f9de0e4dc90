use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;
use uuid::Uuid;

use crate::{
    common_models::{did::DidValue, ValidationError},
    credential_formatter::{model::Context, profile::ProfileId},
};

pub const PRESENTATION_QUERY_MESSAGE_TYPE: &str = "PresentationQueryMessage";
pub const PRESENTATION_RESPONSE_MESSAGE_TYPE: &str = "PresentationResponseMessage";
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// Encoding of a signed presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PresentationFormat {
    #[default]
    #[strum(to_string = "jwt")]
    Jwt,
    #[strum(to_string = "json-ld")]
    JsonLd,
}

impl PresentationFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jwt" => Some(Self::Jwt),
            "json-ld" | "jsonld" | "ldp" => Some(Self::JsonLd),
            _ => None,
        }
    }
}

/// A presentation before signing.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiablePresentation {
    pub id: String,
    pub holder_did: DidValue,
    pub credential_ids: Vec<String>,
    /// Embedded credentials, compact JWTs as strings or JSON documents. Takes precedence
    /// over `credential_ids` when present.
    pub credentials: Vec<Value>,
    pub profile_id: ProfileId,
    pub proof: Option<Value>,
}

impl VerifiablePresentation {
    pub fn builder(holder_did: DidValue) -> VerifiablePresentationBuilder {
        VerifiablePresentationBuilder {
            id: None,
            holder_did,
            credential_ids: vec![],
            credentials: vec![],
            profile_id: ProfileId::default(),
        }
    }
}

pub struct VerifiablePresentationBuilder {
    id: Option<String>,
    holder_did: DidValue,
    credential_ids: Vec<String>,
    credentials: Vec<Value>,
    profile_id: ProfileId,
}

impl VerifiablePresentationBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn credential_ids(mut self, credential_ids: Vec<String>) -> Self {
        self.credential_ids = credential_ids;
        self
    }

    pub fn credentials(mut self, credentials: Vec<Value>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn profile_id(mut self, profile_id: ProfileId) -> Self {
        self.profile_id = profile_id;
        self
    }

    pub fn build(self) -> Result<VerifiablePresentation, ValidationError> {
        if self.credential_ids.is_empty() {
            return Err(ValidationError(
                "presentation must reference at least one credential".to_owned(),
            ));
        }

        Ok(VerifiablePresentation {
            id: self
                .id
                .unwrap_or_else(|| format!("urn:uuid:{}", Uuid::new_v4())),
            holder_did: self.holder_did,
            credential_ids: self.credential_ids,
            credentials: self.credentials,
            profile_id: self.profile_id,
            proof: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationQueryMessage {
    #[serde(rename = "@context", default = "dcp_context")]
    pub context: Vec<String>,
    #[serde(rename = "@type", default = "presentation_query_type")]
    pub r#type: String,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(
        rename = "presentationDefinition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub presentation_definition: Option<Value>,
}

impl PresentationQueryMessage {
    pub fn new(scope: Vec<String>) -> Self {
        Self {
            context: dcp_context(),
            r#type: presentation_query_type(),
            scope,
            presentation_definition: None,
        }
    }

    /// Credential types named by the scopes. `alias:Type:operation` names `Type`, anything
    /// without a colon is a type already.
    pub fn credential_types(&self) -> Vec<String> {
        let mut types: Vec<String> = vec![];
        for scope in &self.scope {
            let Some(credential_type) = scope_credential_type(scope) else {
                tracing::warn!(%scope, "unrecognised scope");
                continue;
            };
            if !types.iter().any(|known| known == credential_type) {
                types.push(credential_type.to_owned());
            }
        }
        types
    }
}

fn scope_credential_type(scope: &str) -> Option<&str> {
    let scope = scope.trim();
    let parts: Vec<&str> = scope.split(':').collect();
    match parts.as_slice() {
        [credential_type] if !credential_type.is_empty() => Some(*credential_type),
        [_, credential_type, ..] if !credential_type.is_empty() => Some(*credential_type),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationResponseMessage {
    #[serde(rename = "@context", default = "dcp_context")]
    pub context: Vec<String>,
    #[serde(rename = "@type", default = "presentation_response_type")]
    pub r#type: String,
    #[serde(default)]
    pub presentation: Vec<Value>,
}

impl PresentationResponseMessage {
    pub fn new(presentation: Vec<Value>) -> Self {
        Self {
            context: dcp_context(),
            r#type: presentation_response_type(),
            presentation,
        }
    }
}

fn dcp_context() -> Vec<String> {
    vec![Context::Dcp.to_string()]
}

fn presentation_query_type() -> String {
    PRESENTATION_QUERY_MESSAGE_TYPE.to_owned()
}

fn presentation_response_type() -> String {
    PRESENTATION_RESPONSE_MESSAGE_TYPE.to_owned()
}
