//! Token snapshot as read from the live map

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::TokenId;
use crate::grid::{Footprint, Square};

/// Which side of the fight a token's actor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Party,
    Opposition,
}

/// Actor-state predicates supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// No condition currently prevents this actor from flanking
    pub can_flank: bool,
    /// The actor is able to make attacks at all
    pub can_attack: bool,
    /// The actor may be the target of a flank
    pub can_be_flanked: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            can_flank: true,
            can_attack: true,
            can_be_flanked: true,
        }
    }
}

/// A token on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub id: TokenId,
    pub name: String,
    /// Occupied squares, in the order the map reports them
    pub squares: Vec<Square>,
    #[serde(default)]
    pub alliance: Option<Alliance>,
    #[serde(default)]
    pub hidden: bool,
    /// Attack reach in length units; `None` when the actor has no reach source
    #[serde(default)]
    pub reach: Option<f64>,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Token {
    /// Single-square token at `square` with melee reach
    pub fn new(name: impl Into<String>, square: Square, alliance: Alliance) -> Self {
        Self {
            id: TokenId::new(),
            name: name.into(),
            squares: vec![square],
            alliance: Some(alliance),
            hidden: false,
            reach: Some(5.0),
            capabilities: Capabilities::default(),
        }
    }

    /// Square token of `size` × `size` squares with its top-left at `origin`
    pub fn sized(name: impl Into<String>, origin: Square, size: i32, alliance: Alliance) -> Self {
        let mut token = Self::new(name, origin, alliance);
        token.squares = (0..size)
            .flat_map(|dx| (0..size).map(move |dy| origin.offset(dx, dy)))
            .collect();
        token
    }

    pub fn with_reach(mut self, reach: Option<f64>) -> Self {
        self.reach = reach;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Occupied squares at the live placement
    pub fn footprint(&self) -> Result<Footprint> {
        Footprint::new(&self.name, &self.squares)
    }

    /// Occupied squares, optionally re-based onto a hypothetical reference square
    pub fn occupied_squares(&self, at: Option<Square>) -> Result<Footprint> {
        let footprint = self.footprint()?;
        Ok(match at {
            Some(square) => footprint.translated_to(square),
            None => footprint,
        })
    }

    /// Reference square of the live placement
    pub fn reference_square(&self) -> Result<Square> {
        Ok(self.footprint()?.reference_square())
    }

    pub fn is_ally(&self, other: &Token) -> bool {
        self.alliance == other.alliance
    }

    /// Able to flank: no preventing condition and able to attack
    pub fn can_flank(&self) -> bool {
        self.capabilities.can_flank && self.capabilities.can_attack
    }

    pub fn can_be_flanked(&self) -> bool {
        self.capabilities.can_be_flanked
    }
}

/// Who is looking at the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewer {
    /// May see hidden tokens
    pub privileged: bool,
}

impl Viewer {
    pub fn player() -> Self {
        Self { privileged: false }
    }

    pub fn game_master() -> Self {
        Self { privileged: true }
    }

    pub fn can_see(&self, token: &Token) -> bool {
        !token.hidden || self.privileged
    }
}
