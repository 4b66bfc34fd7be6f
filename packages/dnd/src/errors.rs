use blockwise_editor::CommandError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DropError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Failed to encode drop message: {0}")]
    Encode(#[from] serde_json::Error),
}
