use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploaderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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

    #[error("Drive not configured — check secrets.")]
    DriveNotConfigured,

    #[error("Drive API returned {status}: {message}")]
    DriveApiError { status: u16, message: String },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Could not parse upload: {message}")]
    ParseError { message: String },

    #[error("Deletion terms must be acknowledged before redaction")]
    ConsentRequired,

    #[error("Unknown platform: {name}")]
    UnknownPlatform { name: String },

    #[error("Invalid anonymous ID '{value}': expected 8 lowercase hex characters")]
    InvalidUserId { value: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Input,
    Storage,
    Auth,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UploaderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::DriveNotConfigured => ErrorCategory::Configuration,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::ParseError { .. }
            | Self::ConsentRequired
            | Self::UnknownPlatform { .. }
            | Self::InvalidUserId { .. }
            | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::DriveApiError { .. } => ErrorCategory::Storage,
            Self::AuthError { .. } => ErrorCategory::Auth,
            Self::SerializationError(_)
            | Self::ZipError(_)
            | Self::CsvError(_) => ErrorCategory::Processing,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Storage => match self {
                // 5xx 與 429 可以重試
                Self::DriveApiError { status, .. } if *status >= 500 || *status == 429 => {
                    ErrorSeverity::Medium
                }
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Auth => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DriveNotConfigured => "Drive not configured — check secrets.".to_string(),
            Self::ConsentRequired => "Please agree to proceed.".to_string(),
            Self::ParseError { .. } => {
                "The uploaded file is not valid JSON or JSON Lines.".to_string()
            }
            Self::UnknownPlatform { name } => format!("'{}' is not a supported platform.", name),
            Self::InvalidUserId { value } => format!("'{}' is not a valid anonymous ID.", value),
            Self::DriveApiError { status, .. } => {
                format!("Google Drive rejected the request (HTTP {}).", status)
            }
            Self::AuthError { .. } => "Could not authenticate with Google Drive.".to_string(),
            Self::HttpError(_) => "Could not reach the remote service.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => match self {
                Self::DriveNotConfigured => "Set drive.folder_id and either drive.access_token or drive.service_account_file (or GDRIVE_* environment variables), or pass --local-store.".to_string(),
                _ => "Check social-uploader.toml and the command line flags.".to_string(),
            },
            ErrorCategory::Network => "Check network connectivity and retry.".to_string(),
            ErrorCategory::Input => match self {
                Self::ConsentRequired => {
                    "Acknowledge the deletion terms (--acknowledge-deletion) and save your anonymous ID.".to_string()
                }
                Self::UnknownPlatform { .. } => format!(
                    "Use one of: {}.",
                    crate::domain::model::Platform::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                _ => "Check the uploaded file and request parameters.".to_string(),
            },
            ErrorCategory::Storage => {
                "Verify the folder ID is shared with the service account and retry.".to_string()
            }
            ErrorCategory::Auth => {
                "Verify the service account key or access token is valid.".to_string()
            }
            ErrorCategory::Processing => "Inspect the input data; it may be malformed.".to_string(),
            ErrorCategory::System => "Check file permissions and available disk space.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UploaderError>;
