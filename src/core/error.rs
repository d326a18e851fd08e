use thiserror::Error;

use crate::core::types::TokenId;
use crate::grid::Square;

#[derive(Error, Debug)]
pub enum FlankError {
    #[error("Token '{token}' occupies no grid squares")]
    EmptyFootprint { token: String },

    #[error("Token '{token}' has invalid reach distance {reach}")]
    InvalidReach { token: String, reach: f64 },

    #[error("Reference square {computed:?} does not match first occupied square {first:?}")]
    InvariantViolation { computed: Square, first: Square },

    #[error("Token not found: {0:?}")]
    TokenNotFound(TokenId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FlankError>;
