use std::fmt;

/// Unified error type for API calls from the desktop client
#[derive(Debug)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse a JSON response
    Parse(serde_json::Error),
    /// Server answered with an error status and message
    Server { status: u16, message: String },
    /// CSV file could not be read
    Csv(csv::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Network error: {}", e),
            ApiError::Parse(e) => write!(f, "Parse error: {}", e),
            ApiError::Server { status, message } => write!(f, "Server error ({}): {}", status, message),
            ApiError::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e) => Some(e),
            ApiError::Parse(e) => Some(e),
            ApiError::Server { .. } => None,
            ApiError::Csv(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err)
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Csv(err)
    }
}

/// Result type alias for client API operations
pub type ApiResult<T> = Result<T, ApiError>;
