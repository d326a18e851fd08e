//! Integer grid squares and inclusive square rectangles

use serde::{Deserialize, Serialize};

use crate::core::types::{Edge, Point};

/// One grid cell addressed by integer (x, y)
///
/// Ordering is by x, then y, which is the same ordering used to pick a
/// footprint's reference square.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Square {
    pub x: i32,
    pub y: i32,
}

impl Square {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset that moves `self` onto `other`
    pub fn delta_to(&self, other: &Self) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Top-left corner of the cell in grid units
    pub fn origin(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

/// Inclusive rectangle of squares, `min` to `max` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SquareBounds {
    pub min: Square,
    pub max: Square,
}

impl SquareBounds {
    pub fn new(min: Square, max: Square) -> Self {
        Self { min, max }
    }

    /// Smallest bounds covering every square, or `None` for an empty input
    pub fn enclosing<'a>(squares: impl IntoIterator<Item = &'a Square>) -> Option<Self> {
        let mut iter = squares.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self::new(first, first);
        for s in iter {
            bounds.min.x = bounds.min.x.min(s.x);
            bounds.min.y = bounds.min.y.min(s.y);
            bounds.max.x = bounds.max.x.max(s.x);
            bounds.max.y = bounds.max.y.max(s.y);
        }
        Some(bounds)
    }

    /// Grow by `by` squares in all four axis directions
    ///
    /// Saturates at the edge of the coordinate range.
    pub fn expand(&self, by: u32) -> Self {
        let by = i32::try_from(by).unwrap_or(i32::MAX);
        Self::new(
            Square::new(self.min.x.saturating_sub(by), self.min.y.saturating_sub(by)),
            Square::new(self.max.x.saturating_add(by), self.max.y.saturating_add(by)),
        )
    }

    pub fn contains(&self, square: &Square) -> bool {
        square.x >= self.min.x
            && square.x <= self.max.x
            && square.y >= self.min.y
            && square.y <= self.max.y
    }

    pub fn width(&self) -> u32 {
        (self.max.x - self.min.x + 1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max.y - self.min.y + 1) as u32
    }

    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Every square in the rectangle, column by column
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (self.min.x..=self.max.x)
            .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| Square::new(x, y)))
    }

    /// Outer boundary segments in grid units: left, right, top, bottom
    pub fn sides(&self) -> [Edge; 4] {
        let left = self.min.x as f64;
        let top = self.min.y as f64;
        let right = (self.max.x + 1) as f64;
        let bottom = (self.max.y + 1) as f64;
        [
            Edge::new(Point::new(left, top), Point::new(left, bottom)),
            Edge::new(Point::new(right, top), Point::new(right, bottom)),
            Edge::new(Point::new(left, top), Point::new(right, top)),
            Edge::new(Point::new(left, bottom), Point::new(right, bottom)),
        ]
    }
}
