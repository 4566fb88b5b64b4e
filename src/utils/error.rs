use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Service returned status {status}: {body}")]
    ServiceStatusError { status: u16, body: String },

    #[error("Malformed service response: {message}")]
    MalformedResponseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Response,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a CLI run that stopped on an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

/// The two failure classes surfaced to callers of the advisory client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkFailure,
    MalformedResponse,
}

impl AdvisorError {
    pub fn malformed(message: impl Into<String>) -> Self {
        AdvisorError::MalformedResponseError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AdvisorError::HttpError(_) | AdvisorError::ServiceStatusError { .. } => {
                ErrorCategory::Network
            }
            AdvisorError::MalformedResponseError { .. } | AdvisorError::SerializationError(_) => {
                ErrorCategory::Response
            }
            AdvisorError::ConfigValidationError { .. }
            | AdvisorError::InvalidConfigValueError { .. }
            | AdvisorError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AdvisorError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Response => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Collapses every error into one of the two caller-visible failure classes.
    /// Anything that is not about the reply's content counts as a network failure.
    pub fn failure_kind(&self) -> FailureKind {
        match self.category() {
            ErrorCategory::Response => FailureKind::MalformedResponse,
            _ => FailureKind::NetworkFailure,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AdvisorError::HttpError(e) if e.is_timeout())
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AdvisorError::HttpError(e) if e.is_timeout() => {
                "The advisory service did not answer in time; \
                 try again or raise service.timeout_seconds"
            }
            AdvisorError::HttpError(_) => "Check your network connection and the service base_url",
            AdvisorError::ServiceStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Check that the API key is valid and has access to the configured model"
            }
            AdvisorError::ServiceStatusError { status, .. } if *status == 429 => {
                "The service is rate limiting requests; wait a moment before trying again"
            }
            AdvisorError::ServiceStatusError { .. } => {
                "The advisory service rejected the request; try again later"
            }
            AdvisorError::MalformedResponseError { .. } | AdvisorError::SerializationError(_) => {
                "The service reply could not be understood; try again"
            }
            AdvisorError::IoError(_) => "Check that the file exists and is readable",
            AdvisorError::ConfigValidationError { .. }
            | AdvisorError::InvalidConfigValueError { .. } => {
                "Fix the highlighted field in the configuration file"
            }
            AdvisorError::MissingConfigError { .. } => {
                "Set the missing value in the configuration file or environment (GEMINI_API_KEY)"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the advisory service ({})", self),
            ErrorCategory::Response => {
                "The advisory service returned an unusable reply".to_string()
            }
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_mapping() {
        let status = AdvisorError::ServiceStatusError {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(status.failure_kind(), FailureKind::NetworkFailure);
        assert_eq!(status.category(), ErrorCategory::Network);

        let malformed = AdvisorError::malformed("not json");
        assert_eq!(malformed.failure_kind(), FailureKind::MalformedResponse);

        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            AdvisorError::from(serde_err).failure_kind(),
            FailureKind::MalformedResponse
        );
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = AdvisorError::MissingConfigError {
            field: "service.api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.user_friendly_message().contains("service.api_key"));
        assert!(err.recovery_suggestion().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let io = AdvisorError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "advisor.toml",
        ));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert_eq!(io.severity().exit_code(), 3);

        let status = AdvisorError::ServiceStatusError {
            status: 503,
            body: String::new(),
        };
        assert_eq!(status.severity().exit_code(), 2);
    }
}
