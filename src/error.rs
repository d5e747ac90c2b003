//! Request error types
//!
//! Every failure a handler can hit maps to exactly one HTTP status code.

use hyper::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServeError>;

/// Errors raised while listing or serving the audio directory
#[derive(Error, Debug)]
pub enum ServeError {
    /// The audio directory is missing or unreadable
    #[error("cannot read audio directory '{}': {source}", .path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file not found: {0}")]
    NotFound(String),

    /// The requested name would resolve outside the audio directory
    #[error("path traversal rejected: {0}")]
    PathTraversal(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::DirectoryAccess { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PathTraversal(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let dir_err = ServeError::DirectoryAccess {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(dir_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ServeError::NotFound("a.mp3".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServeError::PathTraversal("../x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServeError::BadRequest("%ff".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_directory_error_message_names_path() {
        let err = ServeError::DirectoryAccess {
            path: PathBuf::from("/srv/audio"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/srv/audio"));
    }
}
