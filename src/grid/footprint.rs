//! Grid occupancy: the squares a token covers and its reference square
//!
//! The reference square is the minimal-x, then minimal-y occupied square. A
//! footprint can be re-based onto any reference square; translation keeps its
//! shape and the order of its squares.

use ahash::AHashSet;
use serde::Serialize;

use crate::core::error::{FlankError, Result};
use crate::core::types::Point;
use crate::grid::square::{Square, SquareBounds};

/// Non-empty ordered set of squares occupied by a token at one placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footprint {
    squares: Vec<Square>,
    reference: Square,
}

impl Footprint {
    /// Build a footprint from squares in the order the map supplied them
    ///
    /// Duplicate squares are dropped. `owner` names the token in errors.
    pub fn new(owner: &str, squares: &[Square]) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(squares.len());
        let squares: Vec<Square> = squares.iter().copied().filter(|s| seen.insert(*s)).collect();

        let Some(&reference) = squares.iter().min() else {
            return Err(FlankError::EmptyFootprint {
                token: owner.to_string(),
            });
        };

        let footprint = Self { squares, reference };
        if let Err(e) = footprint.check_reference() {
            tracing::warn!(token = owner, "{}; using computed minimum", e);
        }
        Ok(footprint)
    }

    /// Verify the map listed the reference square first
    ///
    /// A mismatch means the occupancy source orders squares inconsistently.
    /// The computed minimum stays authoritative either way.
    pub fn check_reference(&self) -> Result<Square> {
        let first = self.squares[0];
        if first != self.reference {
            return Err(FlankError::InvariantViolation {
                computed: self.reference,
                first,
            });
        }
        Ok(self.reference)
    }

    pub fn reference_square(&self) -> Square {
        self.reference
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Same shape, re-based so the reference square lands on `square`
    pub fn translated_to(&self, square: Square) -> Self {
        let (dx, dy) = self.reference.delta_to(&square);
        Self {
            squares: self.squares.iter().map(|s| s.offset(dx, dy)).collect(),
            reference: square,
        }
    }

    /// Offsets of every square relative to the reference square
    pub fn shape(&self) -> Vec<(i32, i32)> {
        self.squares
            .iter()
            .map(|s| self.reference.delta_to(s))
            .collect()
    }

    /// Mean of occupied square coordinates (grid units, not cell-centred)
    pub fn center(&self) -> Point {
        let n = self.squares.len() as f64;
        let (sx, sy) = self
            .squares
            .iter()
            .fold((0.0, 0.0), |(sx, sy), s| (sx + s.x as f64, sy + s.y as f64));
        Point::new(sx / n, sy / n)
    }

    pub fn bounds(&self) -> SquareBounds {
        let mut bounds = SquareBounds::new(self.reference, self.reference);
        for s in &self.squares {
            bounds.min.x = bounds.min.x.min(s.x);
            bounds.min.y = bounds.min.y.min(s.y);
            bounds.max.x = bounds.max.x.max(s.x);
            bounds.max.y = bounds.max.y.max(s.y);
        }
        bounds
    }

    pub fn contains(&self, square: &Square) -> bool {
        self.squares.contains(square)
    }

    /// Whether any square is shared with `other`
    pub fn overlaps(&self, other: &Footprint) -> bool {
        if !self.bounds_overlap(other) {
            return false;
        }
        let mine: AHashSet<Square> = self.squares.iter().copied().collect();
        other.squares.iter().any(|s| mine.contains(s))
    }

    fn bounds_overlap(&self, other: &Footprint) -> bool {
        let (a, b) = (self.bounds(), other.bounds());
        a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
    }
}
