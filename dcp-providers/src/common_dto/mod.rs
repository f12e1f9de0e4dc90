use serde::{Deserialize, Serialize};

use crate::common_models::{PublicKeyJwk, PublicKeyJwkEllipticData};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kty")]
pub enum PublicKeyJwkDTO {
    #[serde(rename = "EC")]
    Ec(PublicKeyJwkEllipticDataDTO),
    #[serde(rename = "OKP")]
    Okp(PublicKeyJwkEllipticDataDTO),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PublicKeyJwkEllipticDataDTO {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#use: Option<String>,
    pub crv: String,
    pub x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

impl From<PublicKeyJwkDTO> for PublicKeyJwk {
    fn from(value: PublicKeyJwkDTO) -> Self {
        match value {
            PublicKeyJwkDTO::Ec(value) => PublicKeyJwk::Ec(value.into()),
            PublicKeyJwkDTO::Okp(value) => PublicKeyJwk::Okp(value.into()),
        }
    }
}

impl From<PublicKeyJwk> for PublicKeyJwkDTO {
    fn from(value: PublicKeyJwk) -> Self {
        match value {
            PublicKeyJwk::Ec(value) => PublicKeyJwkDTO::Ec(value.into()),
            PublicKeyJwk::Okp(value) => PublicKeyJwkDTO::Okp(value.into()),
        }
    }
}

impl From<PublicKeyJwkEllipticDataDTO> for PublicKeyJwkEllipticData {
    fn from(value: PublicKeyJwkEllipticDataDTO) -> Self {
        Self {
            r#use: value.r#use,
            crv: value.crv,
            x: value.x,
            y: value.y,
        }
    }
}

impl From<PublicKeyJwkEllipticData> for PublicKeyJwkEllipticDataDTO {
    fn from(value: PublicKeyJwkEllipticData) -> Self {
        Self {
            r#use: value.r#use,
            crv: value.crv,
            x: value.x,
            y: value.y,
        }
    }
}
