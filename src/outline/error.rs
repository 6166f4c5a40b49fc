//! Outline model errors

use thiserror::Error;

use crate::scene::SceneError;

use super::signals::BracketKind;
use super::view::DropAction;

/// Failures raised by the outline model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlineError {
    #[error("No scene is attached to the model")]
    NoScene,

    #[error("Drop action {0:?} is not supported")]
    UnsupportedAction(DropAction),

    #[error("Drops are only accepted on the first column, got column {0}")]
    UnsupportedColumn(usize),

    #[error("Drop carries no payload")]
    MissingPayload,

    #[error("Payload does not carry '{0}'")]
    UnsupportedFormat(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Drop target does not stand for a scene node")]
    NoDropTarget,

    #[error("Model index refers to a node that no longer exists")]
    StaleIndex,

    #[error("A {0:?} bracket is already in flight")]
    BracketInFlight(BracketKind),

    #[error("No {0:?} bracket is open")]
    BracketNotOpen(BracketKind),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
