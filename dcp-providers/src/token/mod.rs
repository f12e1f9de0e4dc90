//! Self-issued ID tokens exchanged between DCP participants.
//!
//! A caller authenticates with a JWT it signs with its own DID key (`iss == sub`), addressed
//! to the receiving participant (`aud`). The optional `token` claim carries an access token
//! that the receiver presents back to the caller's credential service.

use async_trait::async_trait;

use self::{error::TokenError, model::TokenContext};

pub mod error;
pub mod imp;
pub mod model;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validates `token` as addressed to `expected_audience` and returns its context.
    async fn validate(
        &self,
        token: &str,
        expected_audience: &str,
    ) -> Result<TokenContext, TokenError>;
}
