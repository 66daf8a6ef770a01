use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkbenchError>;

#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("Rendering error: {0}")]
    Rendering(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid pane ratios: {0}")]
    InvalidRatios(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Convenience constructors
impl WorkbenchError {
    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::Rendering(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn invalid_ratios(msg: impl Into<String>) -> Self {
        Self::InvalidRatios(msg.into())
    }
}
