//! Error types for spiceglass

use thiserror::Error;

/// Result type alias for spiceglass operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for spiceglass
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A reference string did not match the expected grammar
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A permission tree from the wire violated the expected shape
    #[error("Malformed permission tree: {0}")]
    MalformedTree(String),

    /// The permission service answered with an error payload
    #[error("API error: {0}")]
    Api(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Graph rendering errors (GraphViz subprocess)
    #[error("Render error: {0}")]
    Render(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid reference error
    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::InvalidReference(message.into())
    }

    /// Create a new malformed tree error
    pub fn malformed_tree(message: impl Into<String>) -> Self {
        Self::MalformedTree(message.into())
    }

    /// Create a new API error
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    /// Create a new HTTP error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http(message.into())
    }

    /// Create a new render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::invalid_reference("expected `type:id`, got `picard`");
        assert_eq!(
            error.to_string(),
            "Invalid reference: expected `type:id`, got `picard`"
        );

        let error = Error::malformed_tree("node carries neither leaf nor intermediate");
        assert_eq!(
            error.to_string(),
            "Malformed permission tree: node carries neither leaf nor intermediate"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_is_cloneable() {
        let error = Error::api("unauthenticated");
        let cloned = error.clone();
        assert_eq!(error.to_string(), cloned.to_string());
    }
}
