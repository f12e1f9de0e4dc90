//! Issuer, holder and verifier services orchestrating the providers.

pub mod did_service;
pub mod error;
pub mod holder_service;
pub mod identity;
pub mod issuer_service;
pub mod verifier_service;

#[cfg(test)]
pub(crate) mod test_utilities;
