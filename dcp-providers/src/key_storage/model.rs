use zeroize::Zeroizing;

pub struct StorageGeneratedKey {
    pub public_key: Vec<u8>,
    pub key_reference: Zeroizing<Vec<u8>>,
}
