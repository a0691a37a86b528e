//! Error types for foodlog.
//!
//! This module defines the error taxonomy shared by the store backends, the
//! form controller and the CLI. Validation failures carry their own
//! [`FormError`](crate::form::FormError) so callers can show them verbatim.

use std::path::PathBuf;
use thiserror::Error;

use crate::form::FormError;
use crate::record::RecordId;

/// The main error type for foodlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// The submitted form did not pass validation.
    #[error("{0}")]
    Validation(#[from] FormError),

    /// Another submit or delete is still in flight on this controller.
    #[error("another operation is already in progress")]
    Busy,

    // === Record Errors ===
    /// No record with the given id exists.
    #[error("no food record with id {id}")]
    RecordNotFound {
        /// The id that was looked up.
        id: RecordId,
    },

    /// A record with the given id already exists.
    #[error("a food record with id {id} already exists")]
    DuplicateId {
        /// The colliding id.
        id: RecordId,
    },

    // === Storage Errors ===
    /// Failed to write the record document.
    #[error("failed to write {path}: {source}")]
    DocumentWrite {
        /// Path of the document being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a picked image into private storage.
    #[error("failed to copy image {from} to {to}: {source}")]
    ImageCopy {
        /// The picked image.
        from: PathBuf,
        /// The destination inside the image directory.
        to: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for foodlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a record-not-found error.
    #[must_use]
    pub fn not_found(id: &RecordId) -> Self {
        Self::RecordNotFound { id: id.clone() }
    }

    /// Check if this error came from form validation.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error means the record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Busy;
        assert_eq!(err.to_string(), "another operation is already in progress");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_validation_error_passes_message_through() {
        let err: Error = FormError::EmptyName.into();
        assert!(err.is_validation_error());
        assert_eq!(err.to_string(), FormError::EmptyName.to_string());
    }

    #[test]
    fn test_not_found() {
        let err = Error::not_found(&RecordId::from("1700000000000"));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("1700000000000"));
        assert!(!Error::Busy.is_not_found());
    }

    #[test]
    fn test_duplicate_id_display() {
        let err = Error::DuplicateId {
            id: RecordId::from("42"),
        };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_document_write_error_display() {
        let err = Error::DocumentWrite {
            path: PathBuf::from("/data/foods.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/foods.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_image_copy_error_display() {
        let err = Error::ImageCopy {
            from: PathBuf::from("/sdcard/pic.jpg"),
            to: PathBuf::from("/data/images/1_2.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/sdcard/pic.jpg"));
        assert!(msg.contains("/data/images/1_2.jpg"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/foods.db",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "document_name must not be empty".to_string(),
        };
        assert!(err.to_string().contains("document_name"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
