use serde::{Deserialize, Serialize};
use strum::Display;

use super::macros::newtype_conversions;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DidValue(String);
newtype_conversions!(DidValue, String);

impl DidValue {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Method name of the DID, e.g. `web` for `did:web:example.com`.
    pub fn method(&self) -> Option<&str> {
        let mut parts = self.0.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("did"), Some(method), Some(_)) if !method.is_empty() => Some(method),
            _ => None,
        }
    }

    /// Verification method id `<did>#<key_id>`. Key ids already prefixed with the DID
    /// are returned unchanged.
    pub fn key_reference(&self, key_id: &str) -> String {
        if key_id.starts_with(self.as_str()) {
            key_id.to_owned()
        } else {
            format!("{}#{}", self.0, key_id.trim_start_matches('#'))
        }
    }
}

impl From<&str> for DidValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl PartialEq<str> for DidValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Display)]
pub enum KeyRole {
    Authentication,
    AssertionMethod,
}
