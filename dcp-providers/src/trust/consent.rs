use std::sync::Arc;

use time::OffsetDateTime;

use super::{error::TrustError, model::ConsentRecord};
use crate::{common_models::did::DidValue, storage::ConsentStorage};


pub struct ConsentService {
    storage: Arc<dyn ConsentStorage>,
}

impl ConsentService {
    pub fn new(storage: Arc<dyn ConsentStorage>) -> Self {
        Self { storage }
    }

    pub async fn grant(&self, consent: ConsentRecord) -> Result<ConsentRecord, TrustError> {
        tracing::info!(
            consent_id = %consent.id,
            holder = %consent.holder_did,
            granted = ?consent.granted,
            "consent granted"
        );
        self.storage.save(consent.clone()).await?;
        Ok(consent)
    }

    pub async fn revoke(&self, id: &str) -> Result<(), TrustError> {
        if !self.storage.delete(id).await? {
            return Err(TrustError::ConsentNotFound(id.to_owned()));
        }

        tracing::info!(consent_id = id, "consent revoked");
        Ok(())
    }

    /// A record of `holder_did`, unexpired at `now`, granting every one of `credential_types`.
    pub async fn find_valid(
        &self,
        holder_did: &DidValue,
        credential_types: &[String],
        now: OffsetDateTime,
    ) -> Result<Option<ConsentRecord>, TrustError> {
        Ok(self
            .storage
            .find_by_holder(holder_did)
            .await?
            .into_iter()
            .find(|consent| !consent.is_expired(now) && consent.covers(credential_types)))
    }
}
