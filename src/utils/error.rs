use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Command '{command}' failed: {message}")]
    CommandError { command: String, message: String },

    #[error("Runtime error: {0}")]
    RuntimeError(#[from] tokio::runtime::TryCurrentError),
}

impl DispatchError {
    /// 給使用者的修復建議
    pub fn recovery_suggestion(&self) -> String {
        match self {
            DispatchError::IoError(_) => {
                "Check file permissions and that the path exists".to_string()
            }
            DispatchError::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' section of the configuration file", field)
            }
            DispatchError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            DispatchError::CommandError { .. } => {
                "Make sure the shell program exists and is executable".to_string()
            }
            DispatchError::RuntimeError(_) => {
                "Create a BackgroundPool or call from inside a tokio runtime".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
