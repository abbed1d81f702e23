//! Error types for sqlfrag

use thiserror::Error;

/// Result type alias for sqlfrag operations
pub type FragResult<T> = Result<T, FragError>;

/// Errors raised while building or rendering fragments
#[derive(Debug, Error)]
pub enum FragError {
    /// Unknown dialect name or invalid render configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `segments.len()` must equal `slots.len() + 1`
    #[error("Shape mismatch: {segments} segment(s) for {slots} slot(s), expected {}", .slots + 1)]
    ShapeMismatch { segments: usize, slots: usize },

    /// A reserved marker key carried a payload of the wrong shape
    #[error("Invalid `{marker}` marker: {message}")]
    InvalidMarker {
        marker: &'static str,
        message: String,
    },

    /// Validation error (strict rendering)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FragError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid-marker error for the marker named `marker`
    pub fn invalid_marker(marker: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidMarker {
            marker,
            message: message.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a shape mismatch
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for FragError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_expected_count() {
        let err = FragError::ShapeMismatch {
            segments: 3,
            slots: 3,
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch: 3 segment(s) for 3 slot(s), expected 4"
        );
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn invalid_marker_message() {
        let err = FragError::invalid_marker("set", "expected an object");
        assert_eq!(err.to_string(), "Invalid `set` marker: expected an object");
    }
}
