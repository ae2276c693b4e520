use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Request timed out after {after:?}")]
    TimeoutError { after: Duration },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Load already in progress for page '{page}'")]
    LoadInProgress { page: String },

    #[error("Load cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

/// The three failure classes a page can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    MalformedResponse,
    NotFound,
    /// Control-flow signals and local failures that never reach a page.
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Lifecycle,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContentError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ContentError::NotFound { what: what.into() }
    }

    pub fn malformed(url: impl Into<String>, message: impl Into<String>) -> Self {
        ContentError::MalformedResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::ApiError(e) if e.is_decode() => ErrorKind::MalformedResponse,
            ContentError::ApiError(_)
            | ContentError::HttpStatusError { .. }
            | ContentError::TimeoutError { .. } => ErrorKind::NetworkFailure,
            ContentError::MalformedResponse { .. } | ContentError::SerializationError(_) => {
                ErrorKind::MalformedResponse
            }
            ContentError::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ContentError::ApiError(_)
            | ContentError::HttpStatusError { .. }
            | ContentError::TimeoutError { .. } => ErrorCategory::Network,
            ContentError::MalformedResponse { .. }
            | ContentError::SerializationError(_)
            | ContentError::NotFound { .. } => ErrorCategory::Data,
            ContentError::ConfigError { .. }
            | ContentError::ConfigValidationError { .. }
            | ContentError::InvalidConfigValueError { .. }
            | ContentError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ContentError::LoadInProgress { .. } | ContentError::Cancelled => {
                ErrorCategory::Lifecycle
            }
            ContentError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lifecycle => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ContentError::HttpStatusError { status, .. } => *status >= 500 || *status == 429,
            ContentError::ApiError(e) => !e.is_decode(),
            ContentError::TimeoutError { .. } => true,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.kind() {
            ErrorKind::NetworkFailure => {
                "We couldn't reach the content service. Showing offline content.".to_string()
            }
            ErrorKind::MalformedResponse => {
                "The content service sent an unexpected response. Showing offline content."
                    .to_string()
            }
            ErrorKind::NotFound => "The page you are looking for could not be found.".to_string(),
            ErrorKind::Internal => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API base URL and your connection, then try again",
            ErrorCategory::Data => "Return to the listing page and pick an entry from there",
            ErrorCategory::Configuration => "Fix the configuration file or environment variables",
            ErrorCategory::Lifecycle => "Wait for the current load to finish",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_mapping() {
        let status = ContentError::HttpStatusError {
            status: 503,
            url: "http://api/x".to_string(),
        };
        assert_eq!(status.kind(), ErrorKind::NetworkFailure);
        assert!(status.is_retryable());

        let client_error = ContentError::HttpStatusError {
            status: 404,
            url: "http://api/x".to_string(),
        };
        assert_eq!(client_error.kind(), ErrorKind::NetworkFailure);
        assert!(!client_error.is_retryable());

        let malformed = ContentError::malformed("http://api/x", "expected value");
        assert_eq!(malformed.kind(), ErrorKind::MalformedResponse);
        assert!(!malformed.is_retryable());

        let missing = ContentError::not_found("slug 'nope'");
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.severity(), ErrorSeverity::Medium);

        assert_eq!(ContentError::Cancelled.kind(), ErrorKind::Internal);
        assert_eq!(ContentError::Cancelled.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_timeout_is_retryable_network_failure() {
        let err = ContentError::TimeoutError {
            after: Duration::from_secs(3),
        };
        assert_eq!(err.kind(), ErrorKind::NetworkFailure);
        assert!(err.is_retryable());
        assert!(err.user_friendly_message().contains("offline content"));
    }
}
