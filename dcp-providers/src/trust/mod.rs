//! Collaborators consulted while validating presentations: consent to share, trusted
//! issuers per credential type and known credential schemas.

pub mod consent;
pub mod error;
pub mod issuer_trust;
pub mod model;
pub mod schema_registry;
