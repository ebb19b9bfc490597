//! Common error types used throughout the gallery crates.
//!
//! Lookups of missing rows surface as [`Error::NotFound`], rejected input as
//! [`Error::Validation`], and anything the store itself reports as
//! [`Error::Database`].

/// Common error type for gallery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A lookup by name or title matched more than one row.
    #[error("Multiple found: {0}")]
    MultipleFound(String),

    /// Required attributes were missing or invalid.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new MultipleFound error.
    pub fn multiple_found<S: Into<String>>(msg: S) -> Self {
        Self::MultipleFound(msg.into())
    }

    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` for [`Error::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("category 'Nature'");
        assert_eq!(err.to_string(), "Not found: category 'Nature'");

        let err = Error::multiple_found("image titled 'Sunset'");
        assert_eq!(err.to_string(), "Multiple found: image titled 'Sunset'");

        let err = Error::validation("title is required");
        assert_eq!(err.to_string(), "Validation failed: title is required");

        let err = Error::database("connection failed");
        assert_eq!(err.to_string(), "Database error: connection failed");

        let err = Error::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::not_found("x").is_not_found());
        assert!(!Error::not_found("x").is_validation());
        assert!(Error::validation("x").is_validation());
        assert!(!Error::database("x").is_not_found());
    }

    #[test]
    fn test_error_string_into() {
        let err = Error::not_found(String::from("test"));
        assert_eq!(err.to_string(), "Not found: test");

        let err = Error::not_found("test");
        assert_eq!(err.to_string(), "Not found: test");
    }
}
