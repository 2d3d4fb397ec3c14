use std::path::PathBuf;

/// Result type alias for hashstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for hashstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A digest argument had the wrong length or was not hexadecimal
    #[error("invalid digest '{digest}': {reason}")]
    MalformedDigest { digest: String, reason: String },

    /// A well-formed digest has no stored file behind it
    #[error("no stored content for digest '{digest}' (expected at '{path}')")]
    NotFound { digest: String, path: PathBuf },

    /// A path argument did not have the shape of a sharded path
    #[error("invalid path '{path}': {reason}")]
    MalformedPath { path: PathBuf, reason: String },

    /// `put` was handed a source it cannot read from
    #[error("unsupported source: {message}")]
    MalformedSource { message: String },

    /// A resolved path escaped (or, for put-by-path, entered) the store root
    #[error("path '{path}' violates containment of store root '{root}'")]
    PathContainment { path: PathBuf, root: PathBuf },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fieldless discriminant of [`Error`], for branching without matching on
/// payloads or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedDigest,
    MalformedPath,
    NotFound,
    MalformedSource,
    PathContainment,
    Configuration,
    FileSystem,
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl Error {
    /// The kind of failure, independent of its context
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedDigest { .. } => ErrorKind::MalformedDigest,
            Error::MalformedPath { .. } => ErrorKind::MalformedPath,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::MalformedSource { .. } => ErrorKind::MalformedSource,
            Error::PathContainment { .. } => ErrorKind::PathContainment,
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::FileSystem { .. } => ErrorKind::FileSystem,
        }
    }

    /// Whether the error reports absent content
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether the error was raised by input validation, before any I/O
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MalformedDigest { .. }
                | Error::MalformedPath { .. }
                | Error::MalformedSource { .. }
                | Error::PathContainment { .. }
        )
    }

    /// Create a malformed digest error
    #[must_use]
    pub fn malformed_digest(digest: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedDigest {
            digest: digest.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed path error
    #[must_use]
    pub fn malformed_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error for a digest and the path it was expected at
    #[must_use]
    pub fn not_found(digest: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::NotFound {
            digest: digest.into(),
            path: path.into(),
        }
    }

    /// Create a malformed source error
    #[must_use]
    pub fn malformed_source(message: impl Into<String>) -> Self {
        Error::MalformedSource {
            message: message.into(),
        }
    }

    /// Create a containment violation error
    #[must_use]
    pub fn path_containment(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Error::PathContainment {
            path: path.into(),
            root: root.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            Error::malformed_digest("zz", "not hex").kind(),
            ErrorKind::MalformedDigest
        );
        assert_eq!(
            Error::malformed_path("abc", "no separator").kind(),
            ErrorKind::MalformedPath
        );
        assert_eq!(Error::not_found("00", "/x/00").kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::malformed_source("directory").kind(),
            ErrorKind::MalformedSource
        );
        assert_eq!(
            Error::path_containment("/etc/passwd", "/store").kind(),
            ErrorKind::PathContainment
        );
        assert_eq!(
            Error::configuration("depth must be positive").kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert_eq!(err.kind(), ErrorKind::FileSystem);
        assert!(!err.is_validation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::file_system(
            "/store/a/b",
            "create shard directory",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        let message = err.to_string();
        assert!(message.contains("create shard directory"));
        assert!(message.contains("/store/a/b"));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn test_validation_predicate() {
        assert!(Error::malformed_digest("x", "short").is_validation());
        assert!(Error::path_containment("/a", "/b").is_validation());
        assert!(Error::malformed_path("a", "no separator").is_validation());
        assert!(!Error::not_found("x", "/x").is_validation());
        assert!(Error::not_found("x", "/x").is_not_found());
    }
}
