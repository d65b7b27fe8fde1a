//! Errors surfaced by the runtime core.

use overworld::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Only one controller may live in a [`crate::ControllerContext`].
    #[error("a game controller is already registered in this context")]
    DuplicateController,

    #[error("a streaming pass for scene '{scene}' is still in progress")]
    StreamingInProgress { scene: String },

    #[error(transparent)]
    Data(#[from] DataError),
}
