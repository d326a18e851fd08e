pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, FlankConfig};
pub use error::{FlankError, Result};
pub use types::{Edge, Point, TokenId};
