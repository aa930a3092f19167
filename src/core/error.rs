use thiserror::Error;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Assignment search over {units} units exceeds the limit of {limit}")]
    SearchTooLarge { units: usize, limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
