//! **dcp-core** orchestrates the DCP credential-trust providers into the three roles a
//! dataspace connector plays:
//!
//! * **Issuer**: accepts credential requests, issues profile-aware VC JWTs with a
//!   bitstring status list entry, and delivers them to the holder's credential service.
//! * **Holder**: stores received credentials and answers presentation queries, gated by
//!   token validation, rate limiting and consent.
//! * **Verifier**: runs the four-step flow against a holder and validates what it presents.
//!
//! The providers (formatters, generators, DID methods, revocation, trust registries,
//! presentation signing and validation) live in `dcp-providers` and can be used on their
//! own. The core wires them from a [`config::DcpCoreConfig`] and exposes the services
//! and an `axum` router over them.
//!
//! ```ignore rust
//! let core = DcpCore::new(DcpCoreConfig::default(), Arc::new(ReqwestClient::default()))?;
//! let app = api::router(core.app_state());
//! ```

use std::{collections::HashMap, sync::Arc};

use dcp_crypto::imp::{signer::es256::ES256Signer, CryptoProviderImpl};
use dcp_providers::{
    common_models::{did::DidValue, key::Key},
    credential_formatter::imp::{
        provider::CredentialFormatterProviderImpl,
        vc11_jwt::{self, Vc11JwtFormatter},
        vc20_jwt::{self, Vc20JwtFormatter},
    },
    credential_generator::imp::{
        encoder::CredentialEncoder, provider::CredentialGeneratorProviderImpl,
    },
    did::{
        imp::{
            provider::DidMethodProviderImpl,
            web::{self, WebDidMethod},
        },
        provider::DidMethodProvider,
        DidMethod,
    },
    http_client::HttpClient,
    key_algorithm::{
        imp::{es256::Es256, provider::KeyAlgorithmProviderImpl},
        provider::KeyAlgorithmProvider,
        KeyAlgorithm,
    },
    key_storage::{
        imp::{internal::InternalKeyStorage, provider::KeyProviderImpl},
        provider::KeyProvider,
        KeyStorage,
    },
    presentation::{rate_limiter::PresentationRateLimiter, validation::PresentationValidationService},
    remote_entity_storage::in_memory::InMemoryStorage,
    revocation::{imp::status_list::StatusListRevocationService, RevocationService},
    storage::in_memory::{
        InMemoryConsentStorage, InMemoryCredentialRequestStorage, InMemoryCredentialStorage,
        InMemoryPresentationStorage,
    },
    token::imp::self_issued::SelfIssuedIdTokenValidator,
    trust::{
        consent::ConsentService, issuer_trust::IssuerTrustService,
        schema_registry::SchemaRegistryService,
    },
};
use time::OffsetDateTime;
use uuid::Uuid;

use config::{AdminToken, DcpCoreConfig};
use model::{DidMethodType, KeyAlgorithmType, StorageType};
use service::{
    did_service::DidService,
    error::ServiceError,
    holder_service::{HolderService, HolderSettings},
    identity::ParticipantIdentity,
    issuer_service::{IssuerService, StatusListAllocator},
    verifier_service::VerifierService,
};

pub mod api;
pub mod config;
pub mod model;
pub mod service;

pub struct DcpCore {
    pub identity: Arc<ParticipantIdentity>,
    pub did_service: Arc<DidService>,
    pub issuer_service: Arc<IssuerService>,
    pub holder_service: Arc<HolderService>,
    pub verifier_service: Arc<VerifierService>,
    pub issuer_trust: Arc<IssuerTrustService>,
    pub schema_registry: Arc<SchemaRegistryService>,
    admin_token: Option<AdminToken>,
}

impl DcpCore {
    pub fn new(config: DcpCoreConfig, client: Arc<dyn HttpClient>) -> Result<Self, ServiceError> {
        // crypto and key algorithms
        let crypto_provider = Arc::new(CryptoProviderImpl::new(HashMap::from_iter(vec![(
            KeyAlgorithmType::Es256.to_string(),
            Arc::new(ES256Signer {}) as _,
        )])));
        let key_algorithms: HashMap<String, Arc<dyn KeyAlgorithm>> =
            HashMap::from_iter(vec![(KeyAlgorithmType::Es256.to_string(), Arc::new(Es256) as _)]);
        let key_algorithm_provider: Arc<dyn KeyAlgorithmProvider> = Arc::new(
            KeyAlgorithmProviderImpl::new(key_algorithms, crypto_provider),
        );

        // key storage
        let key_storages: HashMap<String, Arc<dyn KeyStorage>> = HashMap::from_iter(vec![(
            StorageType::Internal.to_string(),
            Arc::new(InternalKeyStorage::new(key_algorithm_provider.clone())) as _,
        )]);
        let key_provider = Arc::new(KeyProviderImpl::new(key_storages));

        // did:web with a document cache
        let did_methods: HashMap<String, Arc<dyn DidMethod>> = HashMap::from_iter(vec![(
            DidMethodType::Web.to_string(),
            Arc::new(WebDidMethod::new(
                client.clone(),
                web::Params {
                    resolve_to_insecure_http: Some(config.resolve_to_insecure_http),
                },
            )) as _,
        )]);
        let did_method_provider: Arc<dyn DidMethodProvider> =
            Arc::new(DidMethodProviderImpl::with_cache(
                did_methods,
                Arc::new(InMemoryStorage::default()),
                config.caching.did.cache_size,
                config.caching.did.cache_refresh_timeout(),
                config.caching.did.refresh_after(),
            ));

        // credential profiles
        let leeway = config.formatter.leeway;
        let formatter_provider = Arc::new(CredentialFormatterProviderImpl::new(vec![
            Arc::new(Vc20JwtFormatter::new(vc20_jwt::Params { leeway })) as _,
            Arc::new(Vc11JwtFormatter::new(vc11_jwt::Params { leeway })) as _,
        ]));

        let identity = Arc::new(Self::generate_identity(
            &config,
            key_provider.clone(),
            key_algorithm_provider.clone(),
        )?);
        tracing::info!(did = %identity.did, key = %identity.key_reference(), "identity created");

        let encoder = CredentialEncoder::new(
            formatter_provider.clone(),
            key_provider,
            identity.signing_key(),
            config.formatter.validity(),
        );
        let generator_provider = Arc::new(CredentialGeneratorProviderImpl::with_builtin_generators(
            Arc::new(encoder),
        ));

        let revocation: Arc<dyn RevocationService> = Arc::new(StatusListRevocationService::new(
            client.clone(),
            config.caching.status_list_ttl(),
        ));
        let token_validator = Arc::new(SelfIssuedIdTokenValidator::new(
            did_method_provider.clone(),
            key_algorithm_provider.clone(),
            leeway,
        ));

        // trust registries
        let issuer_trust = Arc::new(IssuerTrustService::new());
        for (credential_type, issuers) in &config.trusted_issuers {
            for issuer in issuers {
                issuer_trust.add_trust(credential_type, DidValue::from(issuer.as_str()));
            }
        }
        let schema_registry = Arc::new(SchemaRegistryService::new());

        let did_service = Arc::new(DidService::new(
            did_method_provider.clone(),
            identity.clone(),
        ));

        let issuer_service = Arc::new(IssuerService::new(
            identity.clone(),
            token_validator.clone(),
            Arc::new(InMemoryCredentialRequestStorage::default()),
            generator_provider,
            did_service.clone(),
            client.clone(),
            config
                .issuer
                .status_list_url
                .as_deref()
                .map(StatusListAllocator::new),
            config.presentation.token_validity(),
        ));

        let holder_service = Arc::new(HolderService::new(
            identity.clone(),
            token_validator.clone(),
            Arc::new(PresentationRateLimiter::new((&config.rate_limit).into())),
            Arc::new(ConsentService::new(Arc::new(
                InMemoryConsentStorage::default(),
            ))),
            Arc::new(InMemoryCredentialStorage::default()),
            Arc::new(InMemoryPresentationStorage::default()),
            revocation.clone(),
            formatter_provider.clone(),
            did_method_provider.clone(),
            key_algorithm_provider.clone(),
            HolderSettings {
                presentation_format: config.presentation.format.to_owned(),
                token_validity: config.presentation.token_validity(),
            },
        ));

        let validation = Arc::new(PresentationValidationService::new(
            formatter_provider,
            did_method_provider,
            key_algorithm_provider,
            issuer_trust.clone(),
            schema_registry.clone(),
            revocation,
        ));
        let verifier_service = Arc::new(VerifierService::new(
            identity.clone(),
            token_validator,
            did_service.clone(),
            client,
            validation,
        ));

        Ok(Self {
            identity,
            did_service,
            issuer_service,
            holder_service,
            verifier_service,
            issuer_trust,
            schema_registry,
            admin_token: config.admin_token,
        })
    }

    pub fn app_state(&self) -> api::AppState {
        api::AppState {
            issuer: self.issuer_service.clone(),
            holder: self.holder_service.clone(),
            verifier: self.verifier_service.clone(),
            did: self.did_service.clone(),
            issuer_trust: self.issuer_trust.clone(),
            admin_token: self.admin_token.clone(),
        }
    }

    /// Fresh ES256 key in internal storage, bound to the configured DID.
    fn generate_identity(
        config: &DcpCoreConfig,
        key_provider: Arc<KeyProviderImpl>,
        key_algorithm_provider: Arc<dyn KeyAlgorithmProvider>,
    ) -> Result<ParticipantIdentity, ServiceError> {
        let storage_type = StorageType::Internal.to_string();
        let key_type = KeyAlgorithmType::Es256.to_string();
        let generated = key_provider
            .get_key_storage(&storage_type)
            .ok_or_else(|| ServiceError::Internal(format!("missing key storage `{storage_type}`")))?
            .generate(&key_type)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let did = DidValue::from(config.identity.did.as_str());

        let key = Key {
            id: Uuid::new_v4().into(),
            created_date: OffsetDateTime::now_utc(),
            public_key: generated.public_key,
            name: format!("{did} signing key"),
            key_reference: generated.key_reference,
            storage_type,
            key_type,
        };

        Ok(ParticipantIdentity::new(
            did,
            key,
            config.identity.key_id.to_owned(),
            config.identity.credential_service_url.to_owned(),
            key_provider,
            key_algorithm_provider,
        ))
    }
}
