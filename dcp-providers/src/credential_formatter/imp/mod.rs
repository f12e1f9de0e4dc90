//! Implementations of the credential profiles.

pub mod common;
pub mod jwt;
pub mod provider;
pub mod vc11_jwt;
pub mod vc20_jwt;

pub(crate) const SIGNING_ALGORITHM: &str = "ES256";
