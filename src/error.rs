use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaleplotError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read run output {path}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid file pattern: {pattern}")]
    InvalidPattern { pattern: String },

    #[error("Cannot plot data: {message}")]
    InvalidPlotData { message: String },

    #[error("Plot rendering failed: {message}")]
    Plot { message: String },

    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ScaleplotError {
    fn user_message(&self) -> String {
        match self {
            ScaleplotError::ReadFailed { path, source } => {
                format!("Could not read {}: {}", path, source)
            }
            ScaleplotError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ScaleplotError::InvalidPattern { pattern } => {
                format!("File pattern has no {{label}} placeholder: {}", pattern)
            }
            ScaleplotError::InvalidPlotData { message } => {
                format!("Cannot plot data: {}", message)
            }
            ScaleplotError::Plot { message } => {
                format!("Plot rendering failed: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ScaleplotError::ReadFailed { .. } => Some(
                "Check that the run output files are readable by the current user.".to_string()
            ),
            ScaleplotError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            ScaleplotError::InvalidPattern { .. } => Some(
                "Use a pattern such as sph_outputs_particles/sph_{label}.out with --input-pattern.".to_string()
            ),
            ScaleplotError::InvalidPlotData { .. } => Some(
                "Log-log plots need positive values on both axes. Try --mode linear.".to_string()
            ),
            ScaleplotError::Plot { .. } => Some(
                "Ensure the output directory exists and is writable.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ScaleplotError {
    fn from(error: toml::de::Error) -> Self {
        ScaleplotError::Config {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScaleplotError {
    fn from(error: serde_json::Error) -> Self {
        ScaleplotError::Serialization {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaleplotError>;
