use std::{collections::HashMap, sync::Arc};

use crate::{
    crypto::{CryptoProvider, Signer},
    key_algorithm::{error::KeyAlgorithmProviderError, provider::KeyAlgorithmProvider, KeyAlgorithm},
};

pub struct KeyAlgorithmProviderImpl {
    algorithms: HashMap<String, Arc<dyn KeyAlgorithm>>,
    crypto: Arc<dyn CryptoProvider>,
}

impl KeyAlgorithmProviderImpl {
    pub fn new(
        algorithms: HashMap<String, Arc<dyn KeyAlgorithm>>,
        crypto: Arc<dyn CryptoProvider>,
    ) -> Self {
        Self { algorithms, crypto }
    }
}

impl KeyAlgorithmProvider for KeyAlgorithmProviderImpl {
    fn get_key_algorithm(&self, algorithm: &str) -> Option<Arc<dyn KeyAlgorithm>> {
        self.algorithms.get(algorithm).cloned()
    }

    fn get_signer(&self, algorithm: &str) -> Result<Arc<dyn Signer>, KeyAlgorithmProviderError> {
        let signer_id = self
            .get_key_algorithm(algorithm)
            .ok_or_else(|| KeyAlgorithmProviderError::UnknownAlgorithm(algorithm.to_owned()))?
            .signer_id();

        self.crypto
            .get_signer(&signer_id)
            .map_err(|e| KeyAlgorithmProviderError::MissingSigner(e.to_string()))
    }
}
