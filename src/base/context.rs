//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting IO errors into context-rich `AuditError` variants.

use crate::base::auditerror::AuditError;
use std::io;
use std::path::Path;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Attach the path an IO operation was working on.
    ///
    /// # Example
    /// ```ignore
    /// use cookieaudit::base::context::IoResultExt;
    ///
    /// let json = std::fs::read_to_string(path).path_context(path)?;
    /// // Error: "I/O failed for /tmp/cookies.json: No such file or directory"
    /// ```
    fn path_context(self, path: &Path) -> Result<T, AuditError>;

    /// Treat an IO failure as the cookie store being unreadable.
    fn store_context(self, path: &Path) -> Result<T, AuditError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn path_context(self, path: &Path) -> Result<T, AuditError> {
        self.map_err(|source| AuditError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn store_context(self, path: &Path) -> Result<T, AuditError> {
        self.map_err(|e| AuditError::unreadable(path.display().to_string(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_path_context() {
        let result: Result<(), io::Error> = Err(Error::new(ErrorKind::NotFound, "missing"));
        let err = result.path_context(Path::new("/tmp/out.json")).unwrap_err();

        match err {
            AuditError::Io { path, source } => {
                assert_eq!(path, "/tmp/out.json");
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            _ => panic!("Expected Io"),
        }
    }

    #[test]
    fn test_store_context() {
        let result: Result<(), io::Error> =
            Err(Error::new(ErrorKind::PermissionDenied, "denied"));
        let err = result.store_context(Path::new("/profile/Cookies")).unwrap_err();

        match err {
            AuditError::Unreadable { path, reason } => {
                assert_eq!(path, "/profile/Cookies");
                assert!(reason.contains("denied"));
            }
            _ => panic!("Expected Unreadable"),
        }
    }
}
