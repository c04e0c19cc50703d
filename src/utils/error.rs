use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReproError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Provisioning failed for environment '{name}': {reason}")]
    ProvisioningError { name: String, reason: String },

    #[error("Environment '{name}' is not provisioned")]
    EnvironmentMissingError { name: String },

    #[error("Toolchain command failed: {message}")]
    ToolchainError { message: String },

    #[error("Driver step '{step}' exited with code {code}")]
    DriverFailure { step: String, code: i32 },
}

/// 錯誤分類，對應 pipeline 的兩個階段加上本地錯誤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provisioning,
    Execution,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReproError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReproError::ConfigValidationError { .. }
            | ReproError::InvalidConfigValueError { .. }
            | ReproError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ReproError::ProvisioningError { .. } | ReproError::EnvironmentMissingError { .. } => {
                ErrorCategory::Provisioning
            }
            ReproError::DriverFailure { .. } => ErrorCategory::Execution,
            ReproError::IoError(_)
            | ReproError::SerializationError(_)
            | ReproError::ToolchainError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Provisioning => ErrorSeverity::Critical,
            ErrorCategory::Execution => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ReproError::ConfigValidationError { field, .. }
            | ReproError::InvalidConfigValueError { field, .. }
            | ReproError::MissingConfigError { field } => {
                format!("Check the '{}' entry in your spec file", field)
            }
            ReproError::ProvisioningError { name, .. } => format!(
                "Remove the existing environment ('conda env remove -n {}') or rerun with --skip-provision",
                name
            ),
            ReproError::EnvironmentMissingError { name } => format!(
                "Provision the environment first ('provision' binary or rerun without --skip-provision); expected name: {}",
                name
            ),
            ReproError::ToolchainError { .. } | ReproError::IoError(_) => {
                "Make sure the environment tool (conda/mamba) is installed and on PATH".to_string()
            }
            ReproError::DriverFailure { step, .. } => format!(
                "Inspect the output of step '{}'; driver failures are owned by the external scripts",
                step
            ),
            ReproError::SerializationError(_) => {
                "The environment tool returned unexpected output; check its version".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Spec file problem: {}", self),
            ErrorCategory::Provisioning => format!("Environment provisioning failed: {}", self),
            ErrorCategory::Execution => format!("Reproduction run failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReproError>;
