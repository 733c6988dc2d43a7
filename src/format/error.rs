//! Error types for region import/export.

use thiserror::Error;

/// Errors that can occur while reading or writing region files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid document structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Required field is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Invalid coordinate values
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates {
        /// Description of the coordinate error
        message: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }
}
