// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the binding engine and the client factory.
//!
//! This module defines the error types that can occur while describing, binding and
//! constructing pre-configured HTTP clients. All errors use `thiserror` for proper
//! error handling and conversion.
//!
//! Only construction-time failures (missing identity, missing collaborator, client
//! build failures) are expected to reach callers. Binding and metadata synthesis are
//! best-effort and log per-entry failures instead of returning them.

use thiserror::Error;

/// The main error type for binding and client construction.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use httpcfg::domain::errors::ConfigError;
///
/// fn client_id() -> Result<String, ConfigError> {
///     Err(ConfigError::MissingIdentity {
///         key: "http.client.id".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Invoking an accessor on a target failed.
    #[error("Failed to invoke method '{method}': {message}")]
    InvocationFailed {
        /// The name of the method being invoked
        method: String,
        /// What went wrong
        message: String,
    },

    /// The arguments passed to an accessor did not match its declared signature.
    #[error("Argument mismatch for method '{method}': expected {expected}, got {actual}")]
    ArgumentMismatch {
        /// The name of the method being invoked
        method: String,
        /// The declared parameter signature
        expected: String,
        /// The supplied arguments
        actual: String,
    },

    /// A fixed argument tuple did not fit the method it was declared for.
    #[error("Invalid default arguments for method '{method}': {message}")]
    InvalidDefaultArguments {
        /// The name of the method
        method: String,
        /// What is wrong with the tuple
        message: String,
    },

    /// An attribute definition was requested for a type the metatype model cannot express.
    #[error("Unsupported attribute type: {type_name}")]
    UnsupportedAttributeType {
        /// The offending type
        type_name: String,
    },

    /// A multi-instance configuration did not carry its identity property.
    #[error("Missing required identity property '{key}'")]
    MissingIdentity {
        /// The identity key that was expected
        key: String,
    },

    /// A required collaborator was not available at construction time.
    #[error("Required collaborator '{name}' is not available")]
    MissingCollaborator {
        /// The collaborator's name
        name: String,
    },

    /// The wrapped HTTP client library refused to build a client.
    #[error("Failed to build HTTP client: {message}")]
    ClientBuildError {
        /// The error message
        message: String,
        /// The underlying library error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The client has already released its transport resources.
    #[error("HTTP client '{id}' has been closed")]
    ClientClosed {
        /// The identity of the closed client
        id: String,
    },

    /// The service registry could not record a registration.
    #[error("Failed to register service '{interface}': {message}")]
    RegistrationFailed {
        /// The interface the service was published under
        interface: String,
        /// What went wrong
        message: String,
    },

    /// A service filter expression could not be parsed.
    #[error("Invalid filter '{filter}': {message}")]
    FilterSyntax {
        /// The filter text
        filter: String,
        /// What is wrong with it
        message: String,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration file or value.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a configuration watcher.
    #[error("Configuration watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an `InvocationFailed` error for the given method.
    pub fn invocation(method: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvocationFailed {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the error is fatal for a construction attempt.
    ///
    /// Fatal errors are surfaced to the operator; everything else is logged and
    /// skipped by the best-effort paths.
    pub fn is_construction_failure(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingIdentity { .. }
                | ConfigError::MissingCollaborator { .. }
                | ConfigError::ClientBuildError { .. }
                | ConfigError::RegistrationFailed { .. }
        )
    }
}

impl From<reqwest::Error> for ConfigError {
    fn from(err: reqwest::Error) -> Self {
        ConfigError::ClientBuildError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// A specialized Result type for binding and client operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_failed_error() {
        let error = ConfigError::invocation("setMaxRedirects", "target rejected value");
        assert_eq!(
            error.to_string(),
            "Failed to invoke method 'setMaxRedirects': target rejected value"
        );
    }

    #[test]
    fn test_argument_mismatch_error() {
        let error = ConfigError::ArgumentMismatch {
            method: "setFooBar".to_string(),
            expected: "(String)".to_string(),
            actual: "(Integer)".to_string(),
        };
        assert!(error.to_string().contains("setFooBar"));
        assert!(error.to_string().contains("(Integer)"));
    }

    #[test]
    fn test_unsupported_attribute_type_error() {
        let error = ConfigError::UnsupportedAttributeType {
            type_name: "IpAddr".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported attribute type: IpAddr");
    }

    #[test]
    fn test_missing_identity_error() {
        let error = ConfigError::MissingIdentity {
            key: "http.client.id".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Missing required identity property 'http.client.id'"
        );
        assert!(error.is_construction_failure());
    }

    #[test]
    fn test_missing_collaborator_error() {
        let error = ConfigError::MissingCollaborator {
            name: "TransportFactory".to_string(),
        };
        assert!(error.to_string().contains("TransportFactory"));
        assert!(error.is_construction_failure());
    }

    #[test]
    fn test_registration_failed_error() {
        let error = ConfigError::RegistrationFailed {
            interface: "HttpClient".to_string(),
            message: "lock poisoned".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to register service 'HttpClient': lock poisoned"
        );
        assert!(error.is_construction_failure());
    }

    #[test]
    fn test_binding_errors_are_not_construction_failures() {
        let error = ConfigError::invocation("setFooBar", "boom");
        assert!(!error.is_construction_failure());
    }

    #[test]
    fn test_source_error() {
        let error = ConfigError::SourceError {
            source_name: "env".to_string(),
            message: "Failed to read environment".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Configuration source 'env' error: Failed to read environment"
        );
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::ParseError {
            message: "Invalid YAML".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Invalid YAML"
        );
    }

    #[test]
    fn test_filter_syntax_error() {
        let error = ConfigError::FilterSyntax {
            filter: "(a=b".to_string(),
            message: "unbalanced parentheses".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid filter '(a=b': unbalanced parentheses"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }
}
