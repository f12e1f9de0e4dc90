use std::{collections::HashMap, sync::Arc};

use time::Duration;

use crate::{
    common_models::did::DidValue,
    did::{
        error::DidMethodProviderError,
        imp::{
            dto::DidDocumentDTO,
            resolver::{DidCachingLoader, DidResolver},
        },
        model::DidDocument,
        provider::DidMethodProvider,
        DidMethod,
    },
    remote_entity_storage::{RemoteEntityStorage, RemoteEntityType},
};

#[cfg(test)]
mod test;

/// Resolves DIDs through a document cache. Methods are keyed by uppercase method name,
/// e.g. `WEB`.
pub struct DidMethodProviderImpl {
    caching_loader: DidCachingLoader,
}

impl DidMethodProviderImpl {
    pub fn new(caching_loader: DidCachingLoader) -> Self {
        Self { caching_loader }
    }

    pub fn with_cache(
        did_methods: HashMap<String, Arc<dyn DidMethod>>,
        storage: Arc<dyn RemoteEntityStorage>,
        cache_size: usize,
        cache_refresh_timeout: Duration,
        refresh_after: Duration,
    ) -> Self {
        Self::new(DidCachingLoader::new(
            Arc::new(DidResolver { did_methods }),
            RemoteEntityType::DidDocument,
            storage,
            cache_size,
            cache_refresh_timeout,
            refresh_after,
        ))
    }
}

#[async_trait::async_trait]
impl DidMethodProvider for DidMethodProviderImpl {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodProviderError> {
        let document = self.caching_loader.resolve(did.as_str()).await?;
        let dto: DidDocumentDTO = serde_json::from_slice(&document)?;
        Ok(dto.into())
    }
}
