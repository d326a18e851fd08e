//! Position search: where could a token stand and still reach an enemy?
//!
//! Squares are visited in an expanding square spiral around the enemy's
//! reference square. Each square reachable from and not occupied by another
//! token is a candidate placement.
//!
//! Termination is a heuristic. Every out-of-reach square adds `1 / leg length`
//! to a streak and any in-reach square resets it; the walk stops once the streak
//! reaches `OUT_OF_REACH_LIMIT`. For a convex reach shape, that amounts to
//! walking four full spiral legs past the last reachable square. That finds
//! every reachable free square while still bounding work on an unbounded
//! map. A non-convex reach could in principle hide reachable squares beyond
//! such a gap.

use std::collections::BTreeSet;

use ahash::AHashSet;

use crate::core::error::Result;
use crate::grid::{Footprint, ReachModel, Square};
use crate::scene::Token;

/// Accumulated out-of-reach streak at which the spiral stops
pub const OUT_OF_REACH_LIMIT: f64 = 4.0;

/// Spiral step directions: up, right, down, left
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Square spiral walk starting at a centre square
///
/// Leg length grows by one after every second turn, so legs run 1, 1, 2, 2,
/// 3, 3, ... and each ring closes before the next starts.
#[derive(Debug, Clone)]
pub struct Spiral {
    square: Square,
    layer: u32,
    step: u32,
    direction: usize,
}

impl Spiral {
    pub fn new(center: Square) -> Self {
        Self {
            square: center,
            layer: 1,
            step: 0,
            direction: 0,
        }
    }

    /// Current leg length; the out-of-reach weight of the next square is its inverse
    pub fn layer(&self) -> u32 {
        self.layer
    }
}

impl Iterator for Spiral {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let current = self.square;
        let (dx, dy) = DIRECTIONS[self.direction];
        self.square = self.square.offset(dx, dy);
        self.step += 1;

        if self.step >= self.layer {
            self.direction = (self.direction + 1) % DIRECTIONS.len();
            self.step = 0;
            if self.direction % 2 == 0 {
                self.layer += 1;
            }
        }
        Some(current)
    }
}

/// Whether `token` placed at `square` would overlap no other token
pub fn can_place(token: &Token, square: Square, tokens: &[Token]) -> Result<bool> {
    let placed = token.occupied_squares(Some(square))?;
    Ok(!other_footprints(token, tokens).any(|other| placed.overlaps(&other)))
}

/// Live footprints of every token except `token`
///
/// A token whose occupancy cannot be read is logged and treated as absent so
/// it cannot block placement checks for everyone else.
fn other_footprints<'t>(token: &'t Token, tokens: &'t [Token]) -> impl Iterator<Item = Footprint> + 't {
    tokens
        .iter()
        .filter(move |other| other.id != token.id)
        .filter_map(|other| match other.footprint() {
            Ok(footprint) => Some(footprint),
            Err(e) => {
                tracing::warn!(token = %other.name, error = %e, "Ignoring unreadable token");
                None
            }
        })
}

/// Every free square from which `token` could reach `enemy`
pub fn positions_in_reach(
    model: &ReachModel,
    token: &Token,
    enemy: &Token,
    tokens: &[Token],
) -> Result<BTreeSet<Square>> {
    let reach = model.reach_in_squares(token)?;
    let footprint = token.footprint()?;
    let target = enemy.footprint()?;

    // Other tokens' squares, collected once for the whole walk
    let occupied: AHashSet<Square> = other_footprints(token, tokens)
        .flat_map(|fp| fp.squares().to_vec())
        .collect();

    let mut found = BTreeSet::new();
    let mut spiral = Spiral::new(target.reference_square());
    let mut streak = 0.0;
    let mut visited = 0usize;

    while streak < OUT_OF_REACH_LIMIT {
        let layer = spiral.layer();
        let Some(square) = spiral.next() else {
            break;
        };
        visited += 1;

        let placed = footprint.translated_to(square);
        let bounds = placed.bounds().expand(reach);
        if target.squares().iter().any(|s| bounds.contains(s)) {
            streak = 0.0;
            if !placed.squares().iter().any(|s| occupied.contains(s)) {
                found.insert(square);
            }
        } else {
            streak += 1.0 / layer as f64;
        }
    }

    tracing::debug!(
        token = %token.name,
        enemy = %enemy.name,
        visited,
        candidates = found.len(),
        "Spiral search finished"
    );
    Ok(found)
}
