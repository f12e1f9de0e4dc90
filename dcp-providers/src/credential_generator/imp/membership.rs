use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{encoder::CredentialEncoder, with_requested_claims};
use crate::credential_generator::{
    error::GeneratorError,
    model::{CredentialContainer, CredentialGenerationContext},
    CredentialTypeGenerator,
};

pub const MEMBERSHIP_CREDENTIAL_TYPE: &str = "MembershipCredential";

pub struct MembershipCredentialGenerator {
    encoder: Arc<CredentialEncoder>,
}

impl MembershipCredentialGenerator {
    pub fn new(encoder: Arc<CredentialEncoder>) -> Self {
        Self { encoder }
    }
}

fn default_claims(now: OffsetDateTime) -> Map<String, Value> {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();

    let mut claims = Map::new();
    claims.insert("membershipType".to_owned(), json!("Premium"));
    claims.insert("status".to_owned(), json!("Active"));
    claims.insert("membershipId".to_owned(), json!(format!("MEMBER-{suffix}")));
    claims.insert("memberSince".to_owned(), json!(now.date().to_string()));
    claims
}

#[async_trait]
impl CredentialTypeGenerator for MembershipCredentialGenerator {
    fn credential_type(&self) -> String {
        MEMBERSHIP_CREDENTIAL_TYPE.to_owned()
    }

    async fn generate_credential(
        &self,
        context: &CredentialGenerationContext,
    ) -> Result<CredentialContainer, GeneratorError> {
        let claims = with_requested_claims(default_claims(OffsetDateTime::now_utc()), context);

        self.encoder
            .encode(context, MEMBERSHIP_CREDENTIAL_TYPE, claims)
            .await
    }
}
