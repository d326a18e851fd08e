//! Map snapshot: tokens and walls as the host currently reports them
//!
//! A `Scene` is read fresh for every recomputation pass and never mutated by
//! the flanking code.

pub mod token;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{FlankError, Result};
use crate::core::types::{Edge, TokenId};
use crate::flanking::obstruction::EdgeSource;
use crate::grid::Square;

pub use token::{Alliance, Capabilities, Token, Viewer};

fn default_grid_size() -> f64 {
    100.0
}

/// Everything the flanking computation reads from the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Pixels per grid square
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Wall-like edges in grid units
    #[serde(default)]
    pub walls: Vec<Edge>,
}

impl Scene {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            grid_size: default_grid_size(),
            tokens,
            walls: Vec::new(),
        }
    }

    pub fn with_walls(mut self, walls: Vec<Edge>) -> Self {
        self.walls = walls;
        self
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Look a token up by id, or fail with `TokenNotFound`
    pub fn token(&self, id: TokenId) -> Result<&Token> {
        self.get(id).ok_or(FlankError::TokenNotFound(id))
    }

    /// Every token's id and occupied squares, for detecting movement between snapshots
    pub fn positions(&self) -> Vec<(TokenId, Vec<Square>)> {
        self.tokens.iter().map(|t| (t.id, t.squares.clone())).collect()
    }

    /// Find a token by name or by its id string
    pub fn find(&self, key: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.name == key || t.id.to_string() == key)
    }
}

impl EdgeSource for Scene {
    fn edges_in(&self, rect: geo::Rect<f64>) -> Vec<Edge> {
        self.walls.edges_in(rect)
    }
}

/// Parse a scene from JSON text
pub fn parse_scene(contents: &str) -> Result<Scene> {
    Ok(serde_json::from_str(contents)?)
}

/// Load a scene snapshot from a JSON file
pub fn load_scene(path: &Path) -> Result<Scene> {
    let contents = fs::read_to_string(path)?;
    parse_scene(&contents)
}
