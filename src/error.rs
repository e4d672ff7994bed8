//! Error types for the library registry

use std::path::PathBuf;

use thiserror::Error;

/// Main application error type.
///
/// Every variant is recoverable at the menu boundary: the caller prints the
/// message and goes back to the prompt.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("A book titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Book '{0}' still has copies on loan or on hold")]
    BookInUse(String),

    #[error("User {0} still has books on loan")]
    UserHasActiveLoans(u32),

    #[error("No copies of '{0}' are available")]
    NoCopiesAvailable(String),

    #[error("User {user_id} has already reserved '{title}'")]
    AlreadyReserved { user_id: u32, title: String },

    #[error("'{0}' has copies on the shelf, borrow it instead of reserving")]
    CopiesAvailable(String),

    #[error("Corrupt library file {}: {reason}", path.display())]
    CorruptFile { path: PathBuf, reason: String },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AppError::CorruptFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for registry operations
pub type AppResult<T> = Result<T, AppError>;
