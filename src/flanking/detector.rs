//! Flank detection for a pair of (possibly hypothetical) ally placements
//!
//! An enemy is flanked when:
//! - no wall crosses the line between the two allies' centres
//! - both allies can reach the enemy from their placements
//! - that line crosses both left and right, or both top and bottom, sides of
//!   the enemy's bounding box

use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::{Edge, Point, TokenId};
use crate::flanking::obstruction::{find_obstruction, touches_or_crosses, EdgeSource};
use crate::grid::{ReachModel, Square, SquareBounds};
use crate::scene::Token;

/// One side of a flanking pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flanker {
    A,
    B,
}

/// Geometric flank test
///
/// `reaches` is asked whether each flanker can reach the enemy and
/// `obstruction` whether anything blocks the line between the centres.
/// Walls are checked first: a wall between the flankers voids the flank
/// regardless of geometry.
pub fn is_flanking<R, O>(
    enemy_bounds: &SquareBounds,
    center_a: Point,
    center_b: Point,
    mut reaches: R,
    mut obstruction: O,
) -> Result<bool>
where
    R: FnMut(Flanker) -> Result<bool>,
    O: FnMut(Point, Point) -> bool,
{
    if obstruction(center_a, center_b) {
        return Ok(false);
    }

    if !reaches(Flanker::A)? || !reaches(Flanker::B)? {
        return Ok(false);
    }

    Ok(crosses_opposite_sides(enemy_bounds, center_a, center_b))
}

/// Whether segment a-b crosses left and right, or top and bottom, of `bounds`
pub fn crosses_opposite_sides(bounds: &SquareBounds, a: Point, b: Point) -> bool {
    let [left, right, top, bottom] = bounds.sides();
    let crosses = |side: &Edge| touches_or_crosses(a, b, side);
    (crosses(&left) && crosses(&right)) || (crosses(&top) && crosses(&bottom))
}

/// Two allies, each at an explicit reference square
#[derive(Debug, Clone, Copy)]
pub struct FlankPair<'a> {
    pub a: &'a Token,
    pub a_square: Square,
    pub b: &'a Token,
    pub b_square: Square,
}

impl<'a> FlankPair<'a> {
    pub fn new(a: &'a Token, a_square: Square, b: &'a Token, b_square: Square) -> Self {
        Self {
            a,
            a_square,
            b,
            b_square,
        }
    }

    /// Pair with both allies at their live positions
    pub fn live(a: &'a Token, b: &'a Token) -> Result<Self> {
        Ok(Self::new(a, a.reference_square()?, b, b.reference_square()?))
    }

    /// Cell-centred footprint centres of both placements
    pub fn centers(&self) -> Result<(Point, Point)> {
        let a = self.a.occupied_squares(Some(self.a_square))?.center().cell_centered();
        let b = self.b.occupied_squares(Some(self.b_square))?.center().cell_centered();
        Ok((a, b))
    }
}

/// Outcome of testing one enemy against a pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlankResult {
    pub enemy: TokenId,
    pub flanked: bool,
    pub center_a: Point,
    pub center_b: Point,
}

/// Outcome of testing every candidate enemy against a pair
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShownFlank {
    /// Enemies flanked by the pair, in input order
    pub flanked: Vec<TokenId>,
    /// Draw the ally-to-ally line only when something is flanked
    pub should_draw_line: bool,
    pub center_a: Point,
    pub center_b: Point,
    /// Wall that voided the pair, if any
    pub blocking: Option<Edge>,
}

/// Flank tests bound to a reach model and a wall source
pub struct FlankDetector<'a, E: EdgeSource + ?Sized> {
    model: ReachModel,
    edges: &'a E,
}

impl<'a, E: EdgeSource + ?Sized> FlankDetector<'a, E> {
    pub fn new(model: ReachModel, edges: &'a E) -> Self {
        Self { model, edges }
    }

    pub fn model(&self) -> &ReachModel {
        &self.model
    }

    /// Test whether `enemy` is flanked by `pair`
    pub fn check(&self, enemy: &Token, pair: &FlankPair<'_>) -> Result<FlankResult> {
        let (center_a, center_b) = pair.centers()?;
        let blocking = find_obstruction(self.edges, center_a, center_b);
        self.check_with(enemy, pair, center_a, center_b, blocking.is_some())
    }

    fn check_with(
        &self,
        enemy: &Token,
        pair: &FlankPair<'_>,
        center_a: Point,
        center_b: Point,
        blocked: bool,
    ) -> Result<FlankResult> {
        let bounds = enemy.footprint()?.bounds();
        let flanked = is_flanking(
            &bounds,
            center_a,
            center_b,
            |flanker| match flanker {
                Flanker::A => self.model.in_reach(pair.a, enemy, Some(pair.a_square)),
                Flanker::B => self.model.in_reach(pair.b, enemy, Some(pair.b_square)),
            },
            |_, _| blocked,
        )?;

        Ok(FlankResult {
            enemy: enemy.id,
            flanked,
            center_a,
            center_b,
        })
    }

    /// Test every enemy against the pair
    ///
    /// An enemy that cannot be evaluated is logged and counted as not flanked;
    /// it never aborts the others.
    pub fn show_flanked(&self, enemies: &[&Token], pair: &FlankPair<'_>) -> Result<ShownFlank> {
        let (center_a, center_b) = pair.centers()?;
        let blocking = find_obstruction(self.edges, center_a, center_b);

        let mut shown = ShownFlank {
            center_a,
            center_b,
            blocking,
            ..ShownFlank::default()
        };

        for enemy in enemies {
            match self.check_with(enemy, pair, center_a, center_b, blocking.is_some()) {
                Ok(result) if result.flanked => shown.flanked.push(enemy.id),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(enemy = %enemy.name, error = %e, "Skipping enemy in flank check");
                }
            }
        }

        shown.should_draw_line = !shown.flanked.is_empty();
        Ok(shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Alliance;

    fn unit_bounds(x: i32, y: i32) -> SquareBounds {
        SquareBounds::new(Square::new(x, y), Square::new(x, y))
    }

    fn setup() -> (Token, Token, Token) {
        let a = Token::new("fighter", Square::new(0, 0), Alliance::Party);
        let b = Token::new("rogue", Square::new(2, 0), Alliance::Party);
        let orc = Token::new("orc", Square::new(1, 0), Alliance::Opposition);
        (a, b, orc)
    }

    #[test]
    fn test_opposite_sides_horizontal() {
        let bounds = unit_bounds(1, 0);
        assert!(crosses_opposite_sides(&bounds, Point::new(0.5, 0.5), Point::new(2.5, 0.5)));
    }

    #[test]
    fn test_adjacent_sides_do_not_flank() {
        // Line crosses left and top only
        let bounds = unit_bounds(1, 1);
        assert!(!crosses_opposite_sides(&bounds, Point::new(0.5, 1.5), Point::new(1.5, 0.5)));
    }

    #[test]
    fn test_diagonal_corners_flank() {
        let bounds = unit_bounds(1, 1);
        assert!(crosses_opposite_sides(&bounds, Point::new(0.5, 0.5), Point::new(2.5, 2.5)));
    }

    #[test]
    fn test_knight_offset_flanks() {
        // (0,0) and (2,1) around (1,0)-(1,1) column still crosses left and right
        let bounds = SquareBounds::new(Square::new(1, 0), Square::new(1, 1));
        assert!(crosses_opposite_sides(&bounds, Point::new(0.5, 0.5), Point::new(2.5, 1.5)));
    }

    #[test]
    fn test_is_flanking_requires_reach() {
        let bounds = unit_bounds(1, 0);
        let result = is_flanking(
            &bounds,
            Point::new(0.5, 0.5),
            Point::new(2.5, 0.5),
            |flanker| Ok(flanker == Flanker::A),
            |_, _| false,
        )
        .unwrap();
        assert!(!result);
    }

    #[test]
    fn test_obstruction_checked_before_reach() {
        let bounds = unit_bounds(1, 0);
        let mut reach_asked = false;
        let result = is_flanking(
            &bounds,
            Point::new(0.5, 0.5),
            Point::new(2.5, 0.5),
            |_| {
                reach_asked = true;
                Ok(true)
            },
            |_, _| true,
        )
        .unwrap();
        assert!(!result);
        assert!(!reach_asked);
    }

    #[test]
    fn test_check_flanked_pair() {
        let (a, b, orc) = setup();
        let walls: Vec<Edge> = Vec::new();
        let detector = FlankDetector::new(ReachModel::default(), &walls);
        let pair = FlankPair::live(&a, &b).unwrap();
        let result = detector.check(&orc, &pair).unwrap();
        assert!(result.flanked);
        assert_eq!(result.center_a, Point::new(0.5, 0.5));
        assert_eq!(result.center_b, Point::new(2.5, 0.5));
    }

    #[test]
    fn test_wall_voids_flank() {
        let (a, b, orc) = setup();
        let walls = vec![Edge::new(Point::new(2.0, -1.0), Point::new(2.0, 2.0))];
        let detector = FlankDetector::new(ReachModel::default(), &walls);
        let pair = FlankPair::live(&a, &b).unwrap();
        assert!(!detector.check(&orc, &pair).unwrap().flanked);
    }

    #[test]
    fn test_out_of_reach_ally_does_not_flank() {
        let (a, _, orc) = setup();
        let far = Token::new("far", Square::new(3, 0), Alliance::Party);
        let walls: Vec<Edge> = Vec::new();
        let detector = FlankDetector::new(ReachModel::default(), &walls);
        let pair = FlankPair::live(&a, &far).unwrap();
        assert!(!detector.check(&orc, &pair).unwrap().flanked);
    }

    #[test]
    fn test_hypothetical_placement() {
        let (a, b, orc) = setup();
        let walls: Vec<Edge> = Vec::new();
        let detector = FlankDetector::new(ReachModel::default(), &walls);
        // Fighter moved below the orc: no longer opposite the rogue
        let pair = FlankPair::new(&a, Square::new(1, 1), &b, Square::new(2, 0));
        assert!(!detector.check(&orc, &pair).unwrap().flanked);
        // Fighter moved to the orc's other diagonal
        let pair = FlankPair::new(&a, Square::new(0, -1), &b, Square::new(2, 1));
        assert!(detector.check(&orc, &pair).unwrap().flanked);
    }

    #[test]
    fn test_show_flanked_draws_line_only_when_flanked() {
        let (a, b, orc) = setup();
        let bystander = Token::new("wolf", Square::new(1, 5), Alliance::Opposition);
        let walls: Vec<Edge> = Vec::new();
        let detector = FlankDetector::new(ReachModel::default(), &walls);
        let pair = FlankPair::live(&a, &b).unwrap();

        let shown = detector.show_flanked(&[&orc, &bystander], &pair).unwrap();
        assert!(shown.should_draw_line);
        assert_eq!(shown.flanked, vec![orc.id]);

        let shown = detector.show_flanked(&[&bystander], &pair).unwrap();
        assert!(!shown.should_draw_line);
        assert!(shown.flanked.is_empty());
    }

    #[test]
    fn test_show_flanked_skips_malformed_enemy() {
        let (a, b, orc) = setup();
        let mut ghost = Token::new("ghost", Square::new(1, 0), Alliance::Opposition);
        ghost.squares.clear();
        let walls: Vec<Edge> = Vec::new();
        let detector = FlankDetector::new(ReachModel::default(), &walls);
        let pair = FlankPair::live(&a, &b).unwrap();

        let shown = detector.show_flanked(&[&ghost, &orc], &pair).unwrap();
        assert_eq!(shown.flanked, vec![orc.id]);
    }

    #[test]
    fn test_show_flanked_reports_blocking_wall() {
        let (a, b, orc) = setup();
        let wall = Edge::new(Point::new(1.5, -1.0), Point::new(1.5, 2.0));
        let walls = vec![wall];
        let detector = FlankDetector::new(ReachModel::default(), &walls);
        let pair = FlankPair::live(&a, &b).unwrap();

        let shown = detector.show_flanked(&[&orc], &pair).unwrap();
        assert!(!shown.should_draw_line);
        assert_eq!(shown.blocking, Some(wall));
    }
}
