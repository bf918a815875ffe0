use enroll_lib::error::{EngineError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("form error: {0}")]
    Engine(#[from] EngineError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to initialise logging: {0}")]
    Logger(String),
}
