use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Meta-model decode error: {0}")]
    Json(#[from] serde_json::Error),
}
