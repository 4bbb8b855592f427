use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("revision conflict on {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StoreError {
    pub fn not_found(name: &str) -> Self {
        Self::NotFound(format!("user {} not found", name))
    }
}
