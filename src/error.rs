//! Static file serving errors

use thiserror::Error;

/// Why a request path could not be served from the site root
#[derive(Debug, Error)]
pub enum ServeError {
    /// Path does not name an existing regular file
    #[error("file not found")]
    NotFound,
    /// Decoded path escapes the site root
    #[error("path escapes site root: {0}")]
    Forbidden(String),
    /// File exists but could not be read
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    /// HTTP status code reported to the client
    ///
    /// Traversal attempts are answered like missing files.
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound | Self::Forbidden(_) => 404,
            Self::Io(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServeError::NotFound.status(), 404);
        assert_eq!(ServeError::Forbidden("../etc".to_string()).status(), 404);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(ServeError::from(io).status(), 500);
    }
}
