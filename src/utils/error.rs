use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error in {source_name}: {message}")]
    TomlParseError {
        source_name: String,
        message: String,
    },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CareError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CareError::IoError(_) => ErrorCategory::Io,
            CareError::TomlParseError { .. }
            | CareError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CareError::SerializationError(_) | CareError::ValidationError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CareError::IoError(_) => ErrorSeverity::Critical,
            CareError::SerializationError(_) => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            CareError::IoError(e) => format!("Could not read an input file: {}", e),
            CareError::SerializationError(_) => "Could not render the report as JSON".to_string(),
            CareError::TomlParseError { source_name, .. } => {
                format!("'{}' is not a valid TOML document", source_name)
            }
            CareError::InvalidConfigValueError { field, reason, .. } => {
                format!("The setting '{}' is invalid: {}", field, reason)
            }
            CareError::ValidationError { message } => format!("Input data rejected: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the file path exists and is readable",
            ErrorCategory::Configuration => {
                "Fix the highlighted setting or remove it to fall back to the default"
            }
            ErrorCategory::Data => {
                "Check the snapshot for duplicate regimen ids or doses pointing at unknown regimens"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CareError>;
