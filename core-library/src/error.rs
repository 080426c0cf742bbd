use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    /// A category kind or value contains a reserved separator.
    #[error("Invalid identifier component {component:?}: contains reserved separator {separator:?}")]
    InvalidIdentifierComponent { component: String, separator: char },

    /// An operation that requires a media id received none.
    #[error("Media id is required")]
    NullIdentifier,

    /// The track source failed while the catalog was loading.
    #[error("Track source failed: {0}")]
    SourceLoadFailure(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Background task failed: {0}")]
    Join(String),
}

impl From<core_async::task::JoinError> for LibraryError {
    fn from(err: core_async::task::JoinError) -> Self {
        LibraryError::Join(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
