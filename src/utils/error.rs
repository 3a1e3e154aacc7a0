use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field '{path}'")]
    MissingField { path: String },

    #[error("Field '{path}' is not {expected}")]
    UnexpectedType { path: String, expected: &'static str },

    #[error("Archive '{path}' could not be read: {message}")]
    ArchiveError { path: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Record,
    Archive,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn missing_field(path: &str) -> Self {
        EtlError::MissingField {
            path: path.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::MissingField { .. }
            | EtlError::UnexpectedType { .. }
            | EtlError::SerializationError(_) => ErrorCategory::Record,
            EtlError::ArchiveError { .. } => ErrorCategory::Archive,
            EtlError::IoError(_) | EtlError::CsvError(_) => ErrorCategory::Io,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    /// Record-level errors only cost one row, so they never fail a run.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Record => ErrorSeverity::Low,
            ErrorCategory::Archive => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ConfigValidationError { .. } => {
                "Check the configuration file syntax and field names"
            }
            EtlError::InvalidConfigValueError { .. } => {
                "Correct the highlighted configuration value and retry"
            }
            EtlError::MissingField { .. } | EtlError::UnexpectedType { .. } => {
                "The record does not follow the post export schema; it was skipped"
            }
            EtlError::SerializationError(_) => "The line is not valid JSON; it was skipped",
            EtlError::ArchiveError { .. } => {
                "Re-download or re-compress the archive; other files were still processed"
            }
            EtlError::IoError(_) | EtlError::CsvError(_) => {
                "Check that the source directory is readable and the destination is writable"
            }
            EtlError::ProcessingError { .. } => "Re-run with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Record => format!("Skipped a malformed post: {}", self),
            ErrorCategory::Archive => format!("Skipped an unreadable archive: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}
