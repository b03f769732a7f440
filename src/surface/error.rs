use thiserror::Error;

/// Errors raised when addressing elements of a [`Dom`](super::Dom).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("Nothing has been rendered yet")]
    NotMounted,

    #[error("No element with id '{id}'")]
    ElementNotFound { id: String },

    #[error("No element at path {path:?}")]
    PathNotFound { path: Vec<usize> },
}
