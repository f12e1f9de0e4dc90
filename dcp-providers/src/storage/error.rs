use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum StorageError {
    #[error("Save error: `{0}`")]
    Save(String),
    #[error("Get error: `{0}`")]
    Get(String),
    #[error("Delete error: `{0}`")]
    Delete(String),
}
