//! Re-export of the signing primitives used across the providers.

pub use dcp_crypto::{imp, CryptoProvider, CryptoProviderError, Signer, SignerError};

#[cfg(any(test, feature = "mock"))]
pub use dcp_crypto::{MockCryptoProvider, MockSigner};
