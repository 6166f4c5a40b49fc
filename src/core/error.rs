//! Error types for the outliner

use thiserror::Error;

use crate::outline::OutlineError;
use crate::scene::SceneError;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Outline error: {0}")]
    Outline(#[from] OutlineError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
