//! Verifiable presentations: assembly, signing, inbound validation and the per-holder rate
//! limit applied to presentation queries.

pub mod error;
pub mod model;
pub mod rate_limiter;
pub mod signer;
pub mod validation;
