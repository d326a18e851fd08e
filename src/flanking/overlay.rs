//! Render primitives handed to the drawing layer
//!
//! Everything is computed in grid units; `PixelMapper` converts to canvas
//! pixels for whichever layer draws it.

use serde::{Deserialize, Serialize};

use crate::core::types::{Edge, Point};
use crate::grid::{Square, SquareBounds};

/// Semantic colour of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayColor {
    /// A flank available from a candidate square
    PotentialFlank,
    /// A flank the token achieves from where it stands now
    FlankAchieved,
    /// Debug: a square the position search accepted
    Candidate,
    /// Debug: a wall that voided a flank
    Obstruction,
}

/// A drawable element in grid units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Segment between two cell-centred points
    Line {
        from: Point,
        to: Point,
        color: OverlayColor,
    },
    /// Marker at a cell-centred point
    Dot { at: Point, color: OverlayColor },
    /// Rectangle outline around whole squares
    Outline {
        origin: Square,
        width: u32,
        height: u32,
        color: OverlayColor,
    },
    /// Raw segment (wall coordinates, not cell-centred)
    Segment { edge: Edge, color: OverlayColor },
}

impl Primitive {
    pub fn color(&self) -> OverlayColor {
        match self {
            Primitive::Line { color, .. }
            | Primitive::Dot { color, .. }
            | Primitive::Outline { color, .. }
            | Primitive::Segment { color, .. } => *color,
        }
    }

    pub fn outline(bounds: &SquareBounds, color: OverlayColor) -> Self {
        Primitive::Outline {
            origin: bounds.min,
            width: bounds.width(),
            height: bounds.height(),
            color,
        }
    }
}

/// All primitives for one token's indicator
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overlay {
    pub primitives: Vec<Primitive>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Line from a to b with a dot at each end
    pub fn flank_line(&mut self, a: Point, b: Point, color: OverlayColor) {
        self.push(Primitive::Line { from: a, to: b, color });
        self.push(Primitive::Dot { at: a, color });
        self.push(Primitive::Dot { at: b, color });
    }

    pub fn count(&self, color: OverlayColor) -> usize {
        self.primitives.iter().filter(|p| p.color() == color).count()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point, OverlayColor)> + '_ {
        self.primitives.iter().filter_map(|p| match *p {
            Primitive::Line { from, to, color } => Some((from, to, color)),
            _ => None,
        })
    }

    pub fn to_pixels(&self, mapper: &PixelMapper) -> Vec<PixelPrimitive> {
        self.primitives.iter().map(|p| mapper.map(p)).collect()
    }
}

/// Primitive converted to canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PixelPrimitive {
    Line {
        from: Point,
        to: Point,
        color: OverlayColor,
    },
    Dot {
        at: Point,
        color: OverlayColor,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: OverlayColor,
    },
}

/// Grid-to-pixel conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapper {
    /// Pixels per grid square
    pub square_size: f64,
}

impl PixelMapper {
    pub fn new(square_size: f64) -> Self {
        Self { square_size }
    }

    /// Scale a grid point to pixels, optionally moving it to the cell middle
    pub fn to_pixel(&self, point: Point, center: bool) -> Point {
        let pixel = point * self.square_size;
        if center {
            pixel + Point::new(self.square_size / 2.0, self.square_size / 2.0)
        } else {
            pixel
        }
    }

    pub fn map(&self, primitive: &Primitive) -> PixelPrimitive {
        let s = self.square_size;
        match *primitive {
            Primitive::Line { from, to, color } => PixelPrimitive::Line {
                from: self.to_pixel(from, false),
                to: self.to_pixel(to, false),
                color,
            },
            Primitive::Dot { at, color } => PixelPrimitive::Dot {
                at: self.to_pixel(at, false),
                color,
            },
            Primitive::Outline {
                origin,
                width,
                height,
                color,
            } => PixelPrimitive::Rect {
                origin: self.to_pixel(origin.origin(), false),
                width: width as f64 * s,
                height: height as f64 * s,
                color,
            },
            Primitive::Segment { edge, color } => PixelPrimitive::Line {
                from: self.to_pixel(edge.a, false),
                to: self.to_pixel(edge.b, false),
                color,
            },
        }
    }
}
