use std::collections::HashMap;

use dcp_providers::presentation::rate_limiter::RateLimitConfig;
use serde::Deserialize;
use time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DcpCoreConfig {
    pub identity: IdentityConfig,
    pub caching: CachingConfig,
    pub rate_limit: RateLimitSettings,
    pub formatter: FormatterConfig,
    pub presentation: PresentationConfig,
    pub issuer: IssuerConfig,
    /// Issuer DIDs trusted per credential type at startup.
    pub trusted_issuers: HashMap<String, Vec<String>>,
    /// Resolve `did:web` over plain HTTP. Only meant for local setups.
    pub resolve_to_insecure_http: bool,
    pub bind_address: BindAddress,
    /// Bearer secret for the consent, token and trust administration endpoints. The
    /// endpoints are not served when unset.
    pub admin_token: Option<AdminToken>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityConfig {
    pub did: String,
    /// Fragment of the signing key in the published DID document.
    pub key_id: String,
    /// Published as the `CredentialService` entry of the DID document.
    pub credential_service_url: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            did: "did:web:localhost%3A8080".to_owned(),
            key_id: "key-1".to_owned(),
            credential_service_url: Some("http://localhost:8080/dcp".to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CachingConfig {
    pub did: CacheEntityConfig,
    pub status_list_ttl_secs: i64,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            did: CacheEntityConfig::default(),
            status_list_ttl_secs: 300,
        }
    }
}

impl CachingConfig {
    pub fn status_list_ttl(&self) -> Duration {
        Duration::seconds(self.status_list_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheEntityConfig {
    pub cache_size: usize,
    pub cache_refresh_timeout_secs: i64,
    pub refresh_after_secs: i64,
}

impl Default for CacheEntityConfig {
    fn default() -> Self {
        Self {
            cache_size: 100,
            cache_refresh_timeout_secs: 86_400,
            refresh_after_secs: 300,
        }
    }
}

impl CacheEntityConfig {
    pub fn cache_refresh_timeout(&self) -> Duration {
        Duration::seconds(self.cache_refresh_timeout_secs)
    }

    pub fn refresh_after(&self) -> Duration {
        Duration::seconds(self.refresh_after_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitSettings {
    pub capacity: u32,
    pub refill_tokens: u32,
    pub refill_period_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            capacity: 5,
            refill_tokens: 5,
            refill_period_secs: 60,
        }
    }
}

impl From<&RateLimitSettings> for RateLimitConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self {
            capacity: settings.capacity,
            refill_tokens: settings.refill_tokens,
            refill_period: std::time::Duration::from_secs(settings.refill_period_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatterConfig {
    pub validity_days: i64,
    /// Clock skew tolerated on token and credential expiry, in seconds.
    pub leeway: u64,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            validity_days: 365,
            leeway: 60,
        }
    }
}

impl FormatterConfig {
    pub fn validity(&self) -> Duration {
        Duration::days(self.validity_days)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresentationConfig {
    /// `jwt` or `json-ld`.
    pub format: String,
    /// Lifetime of tokens minted for verifiers.
    pub token_validity_secs: i64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            format: "jwt".to_owned(),
            token_validity_secs: 300,
        }
    }
}

impl PresentationConfig {
    pub fn token_validity(&self) -> Duration {
        Duration::seconds(self.token_validity_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuerConfig {
    /// Status list credential issued credentials point into. No status entry when unset.
    pub status_list_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct BindAddress(pub String);

impl Default for BindAddress {
    fn default() -> Self {
        Self("0.0.0.0:8080".to_owned())
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AdminToken(pub String);

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken([REDACTED])")
    }
}

#[cfg(test)]
mod test {
    use maplit::hashmap;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = DcpCoreConfig::default();

        assert_eq!(config.identity.key_id, "key-1");
        assert_eq!(config.caching.status_list_ttl(), Duration::minutes(5));
        assert_eq!(config.rate_limit.capacity, 5);
        assert_eq!(config.formatter.validity(), Duration::days(365));
        assert_eq!(config.presentation.format, "jwt");
        assert!(config.issuer.status_list_url.is_none());
        assert!(!config.resolve_to_insecure_http);
        assert!(config.trusted_issuers.is_empty());
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: DcpCoreConfig = serde_json::from_value(json!({
            "identity": { "did": "did:web:issuer.example" },
            "rateLimit": { "capacity": 10 },
            "presentation": { "format": "json-ld" },
            "trustedIssuers": { "MembershipCredential": ["did:web:issuer.example"] },
            "resolveToInsecureHttp": true,
            "bindAddress": "127.0.0.1:9000",
            "adminToken": "s3cret"
        }))
        .unwrap();

        assert_eq!(config.identity.did, "did:web:issuer.example");
        assert_eq!(config.identity.key_id, "key-1");
        assert_eq!(config.rate_limit.capacity, 10);
        assert_eq!(config.rate_limit.refill_tokens, 5);
        assert_eq!(config.presentation.format, "json-ld");
        assert!(config.resolve_to_insecure_http);
        assert_eq!(config.bind_address.0, "127.0.0.1:9000");
        assert_eq!(config.admin_token, Some(AdminToken("s3cret".to_owned())));
        assert!(!format!("{config:?}").contains("s3cret"));
        assert_eq!(
            config.trusted_issuers,
            hashmap! {
                "MembershipCredential".to_owned() => vec!["did:web:issuer.example".to_owned()],
            }
        );

        let rate_limit = RateLimitConfig::from(&config.rate_limit);
        assert_eq!(rate_limit.refill_period, std::time::Duration::from_secs(60));
    }
}
