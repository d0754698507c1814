//! Error types for the profile engine.
//!
//! These are the structural errors of the object graph (unresolvable
//! references, wrong object types, missing trailer or catalog). Rule code
//! converts them into compliance reasons; they never reach the caller of
//! `satisfies_profile`.

use crate::object::ObjectRef;

/// Result type alias for profile engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while inspecting a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Referenced object not found in the document
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// The document has no trailer dictionary
    #[error("Document has no trailer dictionary")]
    MissingTrailer,

    /// The trailer does not lead to a catalog dictionary
    #[error("Document has no catalog dictionary")]
    MissingCatalog,

    /// Invalid PDF structure (generic)
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// XML metadata could not be parsed
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Circular reference detected in object graph
    #[error("Circular reference detected: object {0}")]
    CircularReference(ObjectRef),

    /// Recursion depth limit exceeded
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),
}

impl Error {
    /// Shorthand for a type mismatch error.
    pub fn wrong_type(expected: &str, found: &str) -> Self {
        Error::InvalidObjectType {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Whether this error makes any further checking of the document meaningless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::MissingTrailer | Error::MissingCatalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_not_found_error() {
        let err = Error::ObjectNotFound(10, 0);
        let msg = format!("{}", err);
        assert!(msg.contains("10 0 R"));
    }

    #[test]
    fn test_invalid_object_type_error() {
        let err = Error::wrong_type("Dictionary", "Array");
        let msg = format!("{}", err);
        assert!(msg.contains("Dictionary"));
        assert!(msg.contains("Array"));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(Error::MissingTrailer.is_fatal());
        assert!(Error::MissingCatalog.is_fatal());
        assert!(!Error::ObjectNotFound(1, 0).is_fatal());
        assert!(!Error::RecursionLimitExceeded(64).is_fatal());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
