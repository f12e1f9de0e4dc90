use std::sync::Arc;

use dcp_providers::{
    credential_formatter::{
        imp::{
            provider::CredentialFormatterProviderImpl,
            vc11_jwt::{self, Vc11JwtFormatter},
            vc20_jwt::{self, Vc20JwtFormatter},
        },
        provider::CredentialFormatterProvider,
    },
    credential_generator::{
        imp::{
            encoder::{CredentialEncoder, DEFAULT_VALIDITY},
            provider::CredentialGeneratorProviderImpl,
        },
        provider::CredentialGeneratorProvider,
    },
    did::provider::DidMethodProvider,
    token::{
        imp::{
            access_token::create_access_token,
            self_issued::{create_self_issued_token, SelfIssuedIdTokenValidator},
        },
        TokenValidator,
    },
    util::test_utilities::{TestIdentity, KEY_ID},
};
use time::Duration;

use super::identity::ParticipantIdentity;

pub const ISSUER: &str = "did:web:issuer.example";
pub const HOLDER: &str = "did:web:holder.example";
pub const VERIFIER: &str = "did:web:verifier.example";

pub fn participant(
    identity: &TestIdentity,
    credential_service_url: Option<&str>,
) -> Arc<ParticipantIdentity> {
    Arc::new(ParticipantIdentity::new(
        identity.did.clone(),
        identity.key.clone(),
        KEY_ID,
        credential_service_url.map(str::to_owned),
        identity.key_provider.clone(),
        identity.key_algorithm_provider.clone(),
    ))
}

pub fn formatter_provider() -> Arc<dyn CredentialFormatterProvider> {
    Arc::new(CredentialFormatterProviderImpl::new(vec![
        Arc::new(Vc20JwtFormatter::new(vc20_jwt::Params { leeway: 60 })),
        Arc::new(Vc11JwtFormatter::new(vc11_jwt::Params { leeway: 60 })),
    ]))
}

pub fn generator_provider(issuer: &TestIdentity) -> Arc<dyn CredentialGeneratorProvider> {
    let encoder = CredentialEncoder::new(
        formatter_provider(),
        issuer.key_provider.clone(),
        participant(issuer, None).signing_key(),
        DEFAULT_VALIDITY,
    );
    Arc::new(CredentialGeneratorProviderImpl::with_builtin_generators(
        Arc::new(encoder),
    ))
}

pub fn token_validator(
    did_method_provider: Arc<dyn DidMethodProvider>,
    identity: &TestIdentity,
) -> Arc<dyn TokenValidator> {
    Arc::new(SelfIssuedIdTokenValidator::new(
        did_method_provider,
        identity.key_algorithm_provider.clone(),
        60,
    ))
}

/// Token from `caller` addressed to `audience`.
pub async fn self_issued_token(
    caller: &TestIdentity,
    audience: &str,
    access_token: Option<String>,
) -> String {
    create_self_issued_token(
        &caller.did,
        audience,
        access_token,
        Duration::minutes(5),
        caller.auth_fn(),
    )
    .await
    .unwrap()
}

/// Access token a holder mints for itself, redeemable at its own presentation endpoint.
pub async fn holder_access_token(holder: &TestIdentity, scopes: &[&str]) -> String {
    let scopes: Vec<String> = scopes.iter().map(|scope| scope.to_string()).collect();
    create_access_token(
        holder.did.as_str(),
        holder.did.as_str(),
        holder.did.as_str(),
        &scopes,
        Duration::minutes(5),
        holder.auth_fn(),
    )
    .await
    .unwrap()
}
