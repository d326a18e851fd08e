//! Per-token indicator computation
//!
//! For a reference token T, every visible ally A contributes: the enemies A
//! can reach, the squares T could move to and still reach one of them, and
//! for each such square the enemies T and A would flank together.

use std::collections::BTreeSet;

use crate::core::config::FlankConfig;
use crate::core::error::Result;
use crate::core::types::{Edge, Point};
use crate::flanking::detector::{FlankDetector, FlankPair};
use crate::flanking::obstruction::EdgeSource;
use crate::flanking::overlay::{Overlay, OverlayColor, Primitive};
use crate::flanking::search::positions_in_reach;
use crate::grid::{ReachModel, Square};
use crate::scene::{Scene, Token, Viewer};

/// One recomputation pass over a map snapshot
pub struct Orchestrator<'a, E: EdgeSource + ?Sized> {
    tokens: &'a [Token],
    detector: FlankDetector<'a, E>,
    config: &'a FlankConfig,
    viewer: Viewer,
}

impl<'a> Orchestrator<'a, Scene> {
    pub fn for_scene(scene: &'a Scene, config: &'a FlankConfig, viewer: Viewer) -> Self {
        Self::new(&scene.tokens, scene, config, viewer)
    }
}

impl<'a, E: EdgeSource + ?Sized> Orchestrator<'a, E> {
    pub fn new(tokens: &'a [Token], edges: &'a E, config: &'a FlankConfig, viewer: Viewer) -> Self {
        Self {
            tokens,
            detector: FlankDetector::new(ReachModel::from_config(config), edges),
            config,
            viewer,
        }
    }

    fn model(&self) -> &ReachModel {
        self.detector.model()
    }

    /// Build the full indicator overlay for `token`
    ///
    /// Failures for one ally are logged and skipped; only a malformed `token`
    /// itself is an error.
    pub fn overlay_for(&self, token: &Token) -> Result<Overlay> {
        let mut overlay = Overlay::new();

        if !self.viewer.can_see(token) {
            return Ok(overlay);
        }
        if self.config.self_conditions_prevent_flanking && !token.can_flank() {
            tracing::debug!(token = %token.name, "Conditions prevent flanking");
            return Ok(overlay);
        }

        let self_center = token.footprint()?.center().cell_centered();
        let mut blocking = Vec::new();

        for ally in self.tokens {
            if ally.id == token.id || !token.is_ally(ally) {
                continue;
            }
            if let Err(e) = self.add_ally(token, ally, self_center, &mut overlay, &mut blocking) {
                tracing::warn!(token = %token.name, ally = %ally.name, error = %e, "Skipping ally");
            }
        }

        if self.config.debug {
            for edge in blocking {
                overlay.push(Primitive::Segment {
                    edge,
                    color: OverlayColor::Obstruction,
                });
            }
            tracing::debug!(token = %token.name, primitives = overlay.len(), "Overlay rebuilt");
        }
        Ok(overlay)
    }

    /// Enemies of `token` that `ally` can reach from where it stands
    pub fn enemies_in_reach(&self, token: &Token, ally: &Token) -> Vec<&'a Token> {
        let mut enemies = Vec::new();
        for other in self.tokens {
            if token.is_ally(other) || !self.viewer.can_see(other) || !other.can_be_flanked() {
                continue;
            }
            match self.model().in_reach(ally, other, None) {
                Ok(true) => enemies.push(other),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(enemy = %other.name, error = %e, "Skipping enemy in reach check")
                }
            }
        }
        enemies
    }

    /// Squares `token` could occupy and still reach at least one enemy
    pub fn candidate_squares(&self, token: &Token, enemies: &[&Token]) -> BTreeSet<Square> {
        let mut candidates = BTreeSet::new();
        for enemy in enemies {
            match positions_in_reach(self.model(), token, enemy, self.tokens) {
                Ok(squares) => candidates.extend(squares),
                Err(e) => {
                    tracing::warn!(enemy = %enemy.name, error = %e, "Skipping enemy in position search")
                }
            }
        }
        candidates
    }

    fn add_ally(
        &self,
        token: &Token,
        ally: &Token,
        self_center: Point,
        overlay: &mut Overlay,
        blocking: &mut Vec<Edge>,
    ) -> Result<()> {
        if !self.viewer.can_see(ally) {
            return Ok(());
        }
        if self.config.others_conditions_prevent_flanking && !ally.can_flank() {
            return Ok(());
        }

        let enemies = self.enemies_in_reach(token, ally);
        if enemies.is_empty() {
            return Ok(());
        }

        let candidates = self.candidate_squares(token, &enemies);
        if self.config.debug {
            for square in &candidates {
                overlay.push(Primitive::Dot {
                    at: square.origin().cell_centered(),
                    color: OverlayColor::Candidate,
                });
            }
        }

        let ally_square = ally.reference_square()?;
        for &square in &candidates {
            let pair = FlankPair::new(token, square, ally, ally_square);
            let shown = self.detector.show_flanked(&enemies, &pair)?;

            if let Some(edge) = shown.blocking {
                if !blocking.contains(&edge) {
                    blocking.push(edge);
                }
            }
            if !shown.should_draw_line {
                continue;
            }

            let achieved = shown.center_a == self_center || shown.center_b == self_center;
            let color = if achieved {
                OverlayColor::FlankAchieved
            } else {
                OverlayColor::PotentialFlank
            };

            if achieved {
                for enemy in enemies.iter().filter(|e| shown.flanked.contains(&e.id)) {
                    overlay.push(Primitive::outline(&enemy.footprint()?.bounds(), color));
                }
            }
            overlay.flank_line(shown.center_a, shown.center_b, color);
        }
        Ok(())
    }
}
