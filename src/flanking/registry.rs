//! Per-token indicator state
//!
//! Each token's toggle and computed overlay live here, keyed by token id.
//! Overlays are rebuilt wholesale on every pass.

use ahash::AHashMap;

use crate::core::config::FlankConfig;
use crate::core::error::Result;
use crate::core::types::TokenId;
use crate::flanking::orchestrator::Orchestrator;
use crate::flanking::overlay::Overlay;
use crate::scene::{Scene, Viewer};

/// Toggle state and last computed overlay for one token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorState {
    pub enabled: bool,
    pub overlay: Overlay,
}

impl IndicatorState {
    /// Tooltip for the toggle affordance
    pub fn toggle_label(&self) -> &'static str {
        if self.enabled {
            "Hide Flank Helper"
        } else {
            "Show Flank Helper"
        }
    }
}

#[derive(Debug, Default)]
pub struct IndicatorRegistry {
    states: AHashMap<TokenId, IndicatorState>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, id: TokenId) -> bool {
        self.states.get(&id).is_some_and(|s| s.enabled)
    }

    /// Turn a token's indicator on or off
    ///
    /// Turning it off drops the overlay immediately; turning it on takes effect
    /// at the next recomputation.
    pub fn toggle(&mut self, id: TokenId, enabled: bool) {
        let state = self.states.entry(id).or_default();
        state.enabled = enabled;
        if !enabled {
            state.overlay.clear();
        }
    }

    pub fn toggle_label(&self, id: TokenId) -> &'static str {
        self.states
            .get(&id)
            .map(IndicatorState::toggle_label)
            .unwrap_or("Show Flank Helper")
    }

    pub fn overlay(&self, id: TokenId) -> Option<&Overlay> {
        self.states.get(&id).map(|s| &s.overlay)
    }

    pub fn state(&self, id: TokenId) -> Option<&IndicatorState> {
        self.states.get(&id)
    }

    /// Forget a token that is about to be deleted
    pub fn remove(&mut self, id: TokenId) -> Option<IndicatorState> {
        self.states.remove(&id)
    }

    /// Enabled tokens with their overlays, sorted by id
    pub fn overlays(&self) -> Vec<(TokenId, &Overlay)> {
        let mut out: Vec<_> = self
            .states
            .iter()
            .filter(|(_, s)| s.enabled)
            .map(|(id, s)| (*id, &s.overlay))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    /// Rebuild one token's overlay from the scene
    pub fn recompute(&mut self, id: TokenId, scene: &Scene, config: &FlankConfig, viewer: Viewer) -> Result<()> {
        let token = scene.token(id)?;
        let enabled = self.is_enabled(id);
        let overlay = if enabled {
            Orchestrator::for_scene(scene, config, viewer).overlay_for(token)?
        } else {
            Overlay::new()
        };
        self.states.entry(id).or_default().overlay = overlay;
        Ok(())
    }

    /// Rebuild every indicator from the scene
    ///
    /// Records for tokens no longer on the map are dropped. A token whose
    /// overlay cannot be computed is logged and left empty.
    pub fn recompute_all(&mut self, scene: &Scene, config: &FlankConfig, viewer: Viewer) {
        self.states.retain(|id, _| scene.get(*id).is_some());

        let orchestrator = Orchestrator::for_scene(scene, config, viewer);
        for (id, state) in self.states.iter_mut() {
            state.overlay.clear();
            if !state.enabled {
                continue;
            }
            let Some(token) = scene.get(*id) else {
                continue;
            };
            match orchestrator.overlay_for(token) {
                Ok(overlay) => state.overlay = overlay,
                Err(e) => tracing::warn!(token = %token.name, error = %e, "Indicator recompute failed"),
            }
        }

        tracing::debug!(tokens = self.states.len(), "Recomputed all indicators");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flanking::overlay::OverlayColor;
    use crate::grid::Square;
    use crate::scene::{Alliance, Token};

    fn scene() -> Scene {
        Scene::new(vec![
            Token::new("fighter", Square::new(0, 0), Alliance::Party),
            Token::new("rogue", Square::new(2, 0), Alliance::Party),
            Token::new("orc", Square::new(1, 0), Alliance::Opposition),
        ])
    }

    #[test]
    fn test_disabled_by_default() {
        let scene = scene();
        let mut registry = IndicatorRegistry::new();
        registry.recompute_all(&scene, &FlankConfig::default(), Viewer::player());
        assert!(!registry.is_enabled(scene.tokens[0].id));
        assert_eq!(registry.toggle_label(scene.tokens[0].id), "Show Flank Helper");
        assert!(registry.overlays().is_empty());
    }

    #[test]
    fn test_toggle_and_recompute() {
        let scene = scene();
        let fighter = scene.tokens[0].id;
        let mut registry = IndicatorRegistry::new();

        registry.toggle(fighter, true);
        assert_eq!(registry.toggle_label(fighter), "Hide Flank Helper");
        registry.recompute_all(&scene, &FlankConfig::default(), Viewer::player());

        let overlay = registry.overlay(fighter).unwrap();
        assert!(overlay.count(OverlayColor::FlankAchieved) > 0);

        registry.toggle(fighter, false);
        assert!(registry.overlay(fighter).unwrap().is_empty());
    }

    #[test]
    fn test_deleted_tokens_dropped() {
        let mut scene = scene();
        let orc = scene.tokens[2].id;
        let mut registry = IndicatorRegistry::new();
        registry.toggle(orc, true);

        scene.tokens.retain(|t| t.id != orc);
        registry.recompute_all(&scene, &FlankConfig::default(), Viewer::player());
        assert!(registry.state(orc).is_none());
    }

    #[test]
    fn test_recompute_single_token() {
        let scene = scene();
        let rogue = scene.tokens[1].id;
        let mut registry = IndicatorRegistry::new();
        registry.toggle(rogue, true);
        registry
            .recompute(rogue, &scene, &FlankConfig::default(), Viewer::player())
            .unwrap();
        assert!(!registry.overlay(rogue).unwrap().is_empty());
        assert!(registry
            .recompute(TokenId::new(), &scene, &FlankConfig::default(), Viewer::player())
            .is_err());
    }

    #[test]
    fn test_recompute_all_idempotent() {
        let scene = scene();
        let mut registry = IndicatorRegistry::new();
        for token in &scene.tokens {
            registry.toggle(token.id, true);
        }
        registry.recompute_all(&scene, &FlankConfig::default(), Viewer::player());
        let first: Vec<Overlay> = registry.overlays().into_iter().map(|(_, o)| o.clone()).collect();
        registry.recompute_all(&scene, &FlankConfig::default(), Viewer::player());
        let second: Vec<Overlay> = registry.overlays().into_iter().map(|(_, o)| o.clone()).collect();
        assert_eq!(first, second);
    }
}
