//! Unified error types for paylink-e2e

use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for paylink-e2e
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// WebSocket errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// A bounded wait whose condition was not met in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// An explicit verification that did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Element not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Navigation failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Script execution failed
    #[error("Script execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Test data could not be loaded or indexed
    #[error("Test data error: {0}")]
    TestData(String),

    /// The page session was already closed
    #[error("Page closed: {0}")]
    PageClosed(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new WebSocket error
    pub fn websocket<S: Into<String>>(msg: S) -> Self {
        Error::WebSocket(msg.into())
    }

    /// Create a new CDP error
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new assertion failure
    pub fn assertion<S: Into<String>>(msg: S) -> Self {
        Error::Assertion(msg.into())
    }

    /// Create a new element not found error
    pub fn element_not_found<S: Into<String>>(selector: S) -> Self {
        Error::ElementNotFound(selector.into())
    }

    /// Create a new navigation failed error
    pub fn navigation_failed<S: Into<String>>(msg: S) -> Self {
        Error::NavigationFailed(msg.into())
    }

    /// Create a new script execution failed error
    pub fn script_execution_failed<S: Into<String>>(msg: S) -> Self {
        Error::ScriptExecutionFailed(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new test data error
    pub fn test_data<S: Into<String>>(msg: S) -> Self {
        Error::TestData(msg.into())
    }

    /// Create a new page closed error
    pub fn page_closed<S: Into<String>>(id: S) -> Self {
        Error::PageClosed(id.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Whether this error came from an unmet bounded wait
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Whether this error came from a failed verification
    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::Assertion(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::timeout("waiting for #username to be visible");
        assert_eq!(err.to_string(), "Timeout: waiting for #username to be visible");

        let err = Error::assertion("toast did not contain 'Saved'");
        assert!(err.to_string().starts_with("Assertion failed"));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::timeout("x").is_timeout());
        assert!(!Error::timeout("x").is_assertion());
        assert!(Error::assertion("x").is_assertion());
        assert!(!Error::cdp("x").is_timeout());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
