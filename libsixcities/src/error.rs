//! Error types for six-cities

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SixCitiesError>;

#[derive(Error, Debug)]
pub enum SixCitiesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Token storage error: {0}")]
    Token(#[from] TokenError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),
}

impl SixCitiesError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SixCitiesError::InvalidInput(_) => 3,
            SixCitiesError::Api(api) if api.is_unauthorized() => 2,
            SixCitiesError::Api(_) => 1,
            SixCitiesError::NotFound(_) => 1,
            SixCitiesError::Config(_) => 1,
            SixCitiesError::Token(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True for 401/403 replies, i.e. the session is missing or expired
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }

    /// True for any 4xx reply
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if (400..500).contains(status))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::InvalidResponse(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to access token file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted token file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Keyring operation failed: {0}")]
    Keyring(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = SixCitiesError::InvalidInput("Empty comment".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_unauthorized() {
        let error = SixCitiesError::Api(ApiError::Status {
            status: 401,
            message: "Unauthorized".to_string(),
        });
        assert_eq!(error.exit_code(), 2);

        let forbidden = SixCitiesError::Api(ApiError::Status {
            status: 403,
            message: "Forbidden".to_string(),
        });
        assert_eq!(forbidden.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_other_errors() {
        let not_found = SixCitiesError::Api(ApiError::Status {
            status: 404,
            message: "Offer with id 42 not found.".to_string(),
        });
        assert_eq!(not_found.exit_code(), 1);

        let network = SixCitiesError::Api(ApiError::Network("Connection refused".to_string()));
        assert_eq!(network.exit_code(), 1);

        let config = SixCitiesError::Config(ConfigError::MissingField("api.base_url".to_string()));
        assert_eq!(config.exit_code(), 1);

        assert_eq!(SixCitiesError::NotFound("Offer not found".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting() {
        let error = SixCitiesError::Api(ApiError::Status {
            status: 400,
            message: "Validation error: 'comment' is required".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "API error: Request failed with status 400: Validation error: 'comment' is required"
        );

        // NotFound carries the bare rejection reason
        let error = SixCitiesError::NotFound("Offer not found".to_string());
        assert_eq!(error.to_string(), "Offer not found");
    }

    #[test]
    fn test_client_error_detection() {
        let bad_request = ApiError::Status {
            status: 400,
            message: String::new(),
        };
        assert!(bad_request.is_client_error());
        assert!(!bad_request.is_unauthorized());

        let server = ApiError::Status {
            status: 503,
            message: String::new(),
        };
        assert!(!server.is_client_error());

        assert!(!ApiError::Network("timeout".to_string()).is_client_error());
    }

    #[test]
    fn test_error_conversion_from_token_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: SixCitiesError = TokenError::Io(io).into();
        match error {
            SixCitiesError::Token(_) => {}
            _ => panic!("Expected SixCitiesError::Token"),
        }
    }

    #[test]
    fn test_api_error_clone() {
        let original = ApiError::Network("Connection failed".to_string());
        let cloned = original.clone();
        assert_eq!(original, cloned);
    }
}
