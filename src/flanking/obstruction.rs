//! Obstruction test: does a wall stand between two points?

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::Rect;

use crate::core::types::{Edge, Point};

/// Supplies wall-like edges near a query rectangle
///
/// Implementations return every edge whose bounding box overlaps `rect`; extra
/// edges are harmless, missing ones are not.
pub trait EdgeSource {
    fn edges_in(&self, rect: Rect<f64>) -> Vec<Edge>;
}

impl EdgeSource for [Edge] {
    fn edges_in(&self, rect: Rect<f64>) -> Vec<Edge> {
        self.iter()
            .copied()
            .filter(|edge| rects_overlap(edge.bounding_rect(), rect))
            .collect()
    }
}

impl EdgeSource for Vec<Edge> {
    fn edges_in(&self, rect: Rect<f64>) -> Vec<Edge> {
        self.as_slice().edges_in(rect)
    }
}

fn rects_overlap(a: Rect<f64>, b: Rect<f64>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x && a.min().y <= b.max().y && b.min().y <= a.max().y
}

/// Rectangle spanned by two points, used to pre-filter edges
fn query_rect(a: Point, b: Point) -> Rect<f64> {
    Rect::new(a, b)
}

/// Whether `edge` crosses the open segment a-b at an interior point of both
pub fn properly_crosses(a: Point, b: Point, edge: &Edge) -> bool {
    if a == b {
        return false;
    }
    matches!(
        line_intersection(Edge::new(a, b).to_line(), edge.to_line()),
        Some(LineIntersection::SinglePoint { is_proper: true, .. })
    )
}

/// Whether segment a-b meets `side` at a single point, touching included
///
/// Collinear overlap does not count: a line running along a side has not
/// crossed it.
pub fn touches_or_crosses(a: Point, b: Point, side: &Edge) -> bool {
    if a == b {
        return false;
    }
    matches!(
        line_intersection(Edge::new(a, b).to_line(), side.to_line()),
        Some(LineIntersection::SinglePoint { .. })
    )
}

/// First edge that blocks the straight line between a and b
fn first_blocking(a: Point, b: Point, edges: &[Edge]) -> Option<Edge> {
    edges.iter().copied().find(|edge| properly_crosses(a, b, edge))
}

/// Whether any edge blocks the straight line between a and b
pub fn blocked(a: Point, b: Point, edges: &[Edge]) -> bool {
    first_blocking(a, b, edges).is_some()
}

/// Query `source` for edges near a-b and return the first that blocks
pub fn find_obstruction<E: EdgeSource + ?Sized>(source: &E, a: Point, b: Point) -> Option<Edge> {
    let edges = source.edges_in(query_rect(a, b));
    first_blocking(a, b, &edges)
}
