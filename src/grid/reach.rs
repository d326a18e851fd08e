//! Reach model: attack distance in squares and the squares it covers
//!
//! Reach is a rectangular (Chebyshev) expansion of the token's footprint
//! bounding box, matching grid-combat reach rules.

use crate::core::config::FlankConfig;
use crate::core::error::{FlankError, Result};
use crate::grid::square::{Square, SquareBounds};
use crate::scene::Token;

/// Converts reach distances to squares and answers reach queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachModel {
    length_per_square: f64,
    default_reach: f64,
}

impl Default for ReachModel {
    fn default() -> Self {
        Self::from_config(&FlankConfig::default())
    }
}

impl ReachModel {
    pub fn new(length_per_square: f64, default_reach: f64) -> Self {
        Self {
            length_per_square,
            default_reach,
        }
    }

    pub fn from_config(config: &FlankConfig) -> Self {
        Self::new(config.length_per_square, config.default_reach)
    }

    /// Reach distance in whole squares, floored
    ///
    /// Tokens with no reach source fall back to melee reach with a warning.
    pub fn reach_in_squares(&self, token: &Token) -> Result<u32> {
        let reach = match token.reach {
            Some(reach) => reach,
            None => {
                tracing::warn!(
                    token = %token.name,
                    default = self.default_reach,
                    "No reach source for token, assuming melee reach"
                );
                self.default_reach
            }
        };

        let squares = (reach / self.length_per_square).floor();
        // Reach boxes are built in i32 square coordinates
        if !reach.is_finite() || reach < 0.0 || squares > i32::MAX as f64 {
            return Err(FlankError::InvalidReach {
                token: token.name.clone(),
                reach,
            });
        }

        Ok(squares as u32)
    }

    /// Rectangle of squares within reach of the token (optionally at `at`)
    pub fn reach_bounds(&self, token: &Token, at: Option<Square>) -> Result<SquareBounds> {
        let reach = self.reach_in_squares(token)?;
        Ok(token.occupied_squares(at)?.bounds().expand(reach))
    }

    /// Every square within reach of the token, inclusive
    pub fn squares_in_reach(&self, token: &Token, at: Option<Square>) -> Result<Vec<Square>> {
        Ok(self.reach_bounds(token, at)?.squares().collect())
    }

    /// Whether `a` (optionally placed at `a_at`) can reach any square `b` occupies
    pub fn in_reach(&self, a: &Token, b: &Token, a_at: Option<Square>) -> Result<bool> {
        let bounds = self.reach_bounds(a, a_at)?;
        let target = b.footprint()?;
        Ok(target.squares().iter().any(|s| bounds.contains(s)))
    }
}
