use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::macros::newtype_conversions;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct KeyId(Uuid);
newtype_conversions!(KeyId, Uuid);

/// Signing key owned by this connector. The private part is only ever read by the
/// key storage identified by `storage_type`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Key {
    pub id: KeyId,
    pub created_date: OffsetDateTime,
    pub public_key: Vec<u8>,
    pub name: String,
    pub key_reference: Zeroizing<Vec<u8>>,
    pub storage_type: String,
    pub key_type: String,
}
