//! Credential profiles and per-type profile selection.
//!
//! Requested claims may carry a reserved metadata map selecting the profile per credential
//! type:
//!
//! ```json
//! { "__credentialMetadata": { "MembershipCredential": { "profile": "vc11-sl2021/jwt" } } }
//! ```
//!
//! Anything missing or unrecognised resolves to [`ProfileId::default`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use super::{error::FormatterError, imp::jwt::Jwt, model::Context};

pub const CREDENTIAL_METADATA_KEY: &str = "__credentialMetadata";
const PROFILE_KEY: &str = "profile";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ProfileId {
    /// VC Data Model 1.1 with StatusList2021, everything nested under `vc`.
    #[strum(to_string = "VC11_SL2021_JWT", serialize = "vc11-sl2021/jwt")]
    #[serde(rename = "VC11_SL2021_JWT", alias = "vc11-sl2021/jwt")]
    Vc11Sl2021Jwt,
    /// VC Data Model 2.0 with Bitstring Status List, claims flat in the JWT.
    #[default]
    #[strum(to_string = "VC20_BSSL_JWT", serialize = "vc20-bssl/jwt")]
    #[serde(rename = "VC20_BSSL_JWT", alias = "vc20-bssl/jwt")]
    Vc20BsslJwt,
}

impl ProfileId {
    /// Accepts the canonical name or the short alias, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    pub fn base_context(&self) -> Context {
        match self {
            ProfileId::Vc11Sl2021Jwt => Context::CredentialsV1,
            ProfileId::Vc20BsslJwt => Context::CredentialsV2,
        }
    }

    pub fn status_entry_type(&self) -> &'static str {
        match self {
            ProfileId::Vc11Sl2021Jwt => "StatusList2021Entry",
            ProfileId::Vc20BsslJwt => "BitstringStatusListEntry",
        }
    }

    pub fn jwt_type(&self) -> &'static str {
        match self {
            ProfileId::Vc11Sl2021Jwt => "JWT",
            ProfileId::Vc20BsslJwt => "vc+ld+jwt",
        }
    }

    /// Reads the profile from a received token: a `vc` claim marks VC 1.1.
    pub fn detect_from_token(token: &str) -> Result<Self, FormatterError> {
        let decomposed = Jwt::<Map<String, Value>>::decompose_token(token)?;

        Ok(if decomposed.payload.custom.contains_key("vc") {
            ProfileId::Vc11Sl2021Jwt
        } else {
            ProfileId::Vc20BsslJwt
        })
    }
}

pub struct ProfileExtractor;

impl ProfileExtractor {
    /// Never fails: missing metadata or unknown aliases fall back to the default profile.
    pub fn extract(requested_claims: Option<&Map<String, Value>>, credential_type: &str) -> ProfileId {
        let Some(profile) = requested_claims
            .and_then(|claims| claims.get(CREDENTIAL_METADATA_KEY))
            .and_then(|metadata| metadata.get(credential_type))
            .and_then(|entry| entry.get(PROFILE_KEY))
            .and_then(Value::as_str)
        else {
            return ProfileId::default();
        };

        ProfileId::parse(profile).unwrap_or_else(|| {
            tracing::warn!(
                profile,
                credential_type,
                "unknown credential profile, using default"
            );
            ProfileId::default()
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn claims(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_aliases_ignore_case() {
        assert_eq!(ProfileId::parse("vc11-sl2021/jwt"), Some(ProfileId::Vc11Sl2021Jwt));
        assert_eq!(ProfileId::parse("VC11-SL2021/JWT"), Some(ProfileId::Vc11Sl2021Jwt));
        assert_eq!(ProfileId::parse("vc20_bssl_jwt"), Some(ProfileId::Vc20BsslJwt));
        assert_eq!(ProfileId::parse("vc30/cbor"), None);
        assert_eq!(ProfileId::Vc11Sl2021Jwt.to_string(), "VC11_SL2021_JWT");
    }

    #[test]
    fn test_extract_explicit_profile() {
        let claims = claims(json!({
            "__credentialMetadata": { "MembershipCredential": { "profile": "vc11-sl2021/jwt" } }
        }));

        assert_eq!(
            ProfileExtractor::extract(Some(&claims), "MembershipCredential"),
            ProfileId::Vc11Sl2021Jwt
        );
    }

    #[test]
    fn test_extract_falls_back_to_default() {
        let no_metadata = claims(json!({ "membershipType": "Gold" }));
        let other_type = claims(json!({
            "__credentialMetadata": { "OrganizationCredential": { "profile": "vc11-sl2021/jwt" } }
        }));
        let no_profile_key = claims(json!({
            "__credentialMetadata": { "MembershipCredential": { "format": "jwt" } }
        }));
        let unknown_alias = claims(json!({
            "__credentialMetadata": { "MembershipCredential": { "profile": "vc99/jwt" } }
        }));

        for requested in [
            None,
            Some(&no_metadata),
            Some(&other_type),
            Some(&no_profile_key),
            Some(&unknown_alias),
        ] {
            assert_eq!(
                ProfileExtractor::extract(requested, "MembershipCredential"),
                ProfileId::Vc20BsslJwt
            );
        }
    }
}
