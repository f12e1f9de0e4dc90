//! Built-in credential type generators.

use serde_json::{Map, Value};

use super::model::CredentialGenerationContext;

pub mod data_processor;
pub mod encoder;
pub mod generic;
pub mod membership;
pub mod organization;
pub mod provider;


/// `defaults` overlaid with every requested claim that is not reserved metadata.
pub(crate) fn with_requested_claims(
    mut defaults: Map<String, Value>,
    context: &CredentialGenerationContext,
) -> Map<String, Value> {
    if let Some(requested) = &context.requested_claims {
        defaults.extend(
            requested
                .iter()
                .filter(|(name, _)| !name.starts_with("__"))
                .map(|(name, value)| (name.to_owned(), value.to_owned())),
        );
    }
    defaults
}
