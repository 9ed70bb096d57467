//! Error taxonomy shared by every TodoCast service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoCastError {
    #[error("todo is {len} characters long, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("invalid todo id: {0:?}")]
    InvalidId(String),

    /// Request body could not be read as text, e.g. over the size limit.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("todo {0} not found")]
    NotFound(i64),

    #[error("store error: {0}")]
    Store(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TodoCastError {
    /// Caller supplied bad input; nothing was written.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::TooLong { .. } | Self::InvalidId(_) | Self::InvalidBody(_)
        )
    }

    /// HTTP status this error surfaces as.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TooLong { .. } | Self::InvalidId(_) | Self::InvalidBody(_) => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoCastError>;
