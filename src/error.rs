use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag view measured before a tag was set")]
    InvalidState,
    #[error("invalid config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("render failed: {0}")]
    Render(String),
}

pub type Result<T, E = TagError> = std::result::Result<T, E>;
