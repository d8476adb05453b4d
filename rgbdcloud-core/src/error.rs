//! Error types for rgbdcloud

use thiserror::Error;

/// Main error type for rgbdcloud operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported type for field '{field}': kind {kind} with width {width} is not supported")]
    UnsupportedType {
        field: String,
        kind: String,
        width: usize,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed header at '{key}': {reason}")]
    MalformedHeader { key: String, reason: String },

    #[error("Shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Invalid field name: {0}")]
    InvalidFieldName(String),
}

impl Error {
    /// Shorthand for a [`Error::MalformedHeader`]
    pub fn malformed_header(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedHeader {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`Error::ShapeMismatch`]
    pub fn shape_mismatch(what: impl Into<String>, expected: &[usize], found: &[usize]) -> Self {
        Error::ShapeMismatch {
            what: what.into(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}

/// Result type alias for rgbdcloud operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = Error::UnsupportedType {
            field: "intensity".to_string(),
            kind: "F".to_string(),
            width: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("intensity"));
        assert!(msg.contains("8"));

        let err = Error::shape_mismatch("colors", &[3, 4, 3], &[3, 5, 3]);
        let msg = err.to_string();
        assert!(msg.contains("[3, 4, 3]"));
        assert!(msg.contains("[3, 5, 3]"));
    }
}
