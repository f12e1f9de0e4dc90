use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::common_models::ValidationError;

/// Credential schemas by id.
#[derive(Default)]
pub struct SchemaRegistryService {
    schemas: RwLock<HashMap<String, Value>>,
}

impl SchemaRegistryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.schemas.read().contains_key(id)
    }

    pub fn get_schema(&self, id: &str) -> Option<Value> {
        self.schemas.read().get(id).cloned()
    }

    /// Returns the replaced schema, if any.
    pub fn put_schema(&self, id: &str, schema: Value) -> Result<Option<Value>, ValidationError> {
        if id.trim().is_empty() {
            return Err(ValidationError("schema id must not be blank".to_owned()));
        }
        if schema.is_null() {
            return Err(ValidationError(format!("schema `{id}` must not be null")));
        }

        Ok(self.schemas.write().insert(id.to_owned(), schema))
    }

    pub fn remove_schema(&self, id: &str) -> Option<Value> {
        self.schemas.write().remove(id)
    }
}
