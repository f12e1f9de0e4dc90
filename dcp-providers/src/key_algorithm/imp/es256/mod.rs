use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use p256::elliptic_curve::generic_array::GenericArray;
use p256::elliptic_curve::sec1::{EncodedPoint, ToEncodedPoint};
use zeroize::Zeroizing;

use crate::{
    common_models::{PublicKeyJwk, PublicKeyJwkEllipticData},
    crypto::imp::signer::es256::ES256Signer,
    key_algorithm::{error::KeyAlgorithmError, model::GeneratedKey, KeyAlgorithm},
};


const P256_COORDINATE_LENGTH: usize = 32;

#[derive(Default)]
pub struct Es256;

impl KeyAlgorithm for Es256 {
    fn signer_id(&self) -> String {
        "ES256".to_owned()
    }

    fn generate_key_pair(&self) -> GeneratedKey {
        let (private, public) = ES256Signer::random();

        GeneratedKey {
            public,
            private: Zeroizing::new(private),
        }
    }

    fn bytes_to_jwk(
        &self,
        bytes: &[u8],
        r#use: Option<String>,
    ) -> Result<PublicKeyJwk, KeyAlgorithmError> {
        let pk = p256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|e| KeyAlgorithmError::InvalidKey(e.to_string()))?;
        let encoded_point = pk.to_encoded_point(false);
        let x = encoded_point
            .x()
            .ok_or(KeyAlgorithmError::InvalidKey("X is missing".to_string()))?;
        let y = encoded_point
            .y()
            .ok_or(KeyAlgorithmError::InvalidKey("Y is missing".to_string()))?;

        Ok(PublicKeyJwk::Ec(PublicKeyJwkEllipticData {
            r#use,
            crv: "P-256".to_string(),
            x: Base64UrlSafeNoPadding::encode_to_string(x)
                .map_err(|e| KeyAlgorithmError::InvalidKey(e.to_string()))?,
            y: Some(
                Base64UrlSafeNoPadding::encode_to_string(y)
                    .map_err(|e| KeyAlgorithmError::InvalidKey(e.to_string()))?,
            ),
        }))
    }

    fn jwk_to_bytes(&self, jwk: &PublicKeyJwk) -> Result<Vec<u8>, KeyAlgorithmError> {
        let PublicKeyJwk::Ec(data) = jwk else {
            return Err(KeyAlgorithmError::InvalidKey("invalid kty".to_string()));
        };
        if data.crv != "P-256" {
            return Err(KeyAlgorithmError::InvalidKey(format!(
                "unsupported curve `{}`",
                data.crv
            )));
        }

        let x = decode_coordinate(&data.x)?;
        let y = decode_coordinate(
            data.y
                .as_ref()
                .ok_or(KeyAlgorithmError::InvalidKey("Y is missing".to_string()))?,
        )?;

        let encoded_point = EncodedPoint::<p256::NistP256>::from_affine_coordinates(
            GenericArray::from_slice(&x),
            GenericArray::from_slice(&y),
            true,
        );

        // rejects coordinates that are not on the curve
        let public_key = p256::PublicKey::from_sec1_bytes(encoded_point.as_bytes())
            .map_err(|e| KeyAlgorithmError::InvalidKey(e.to_string()))?;

        Ok(public_key.to_encoded_point(true).as_bytes().to_owned())
    }
}

fn decode_coordinate(value: &str) -> Result<Vec<u8>, KeyAlgorithmError> {
    let bytes = Base64UrlSafeNoPadding::decode_to_vec(value, None)
        .map_err(|e| KeyAlgorithmError::InvalidKey(e.to_string()))?;

    if bytes.len() != P256_COORDINATE_LENGTH {
        return Err(KeyAlgorithmError::InvalidKey(format!(
            "invalid coordinate length {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}
