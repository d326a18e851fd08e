//! Flanking integration tests
//!
//! End-to-end checks from a loaded scene down to overlay primitives, plus the
//! worked geometry cases for single-square combatants.

use std::path::PathBuf;

use flank_helper::core::config::{load_config, parse_config, FlankConfig};
use flank_helper::core::types::{Edge, Point};
use flank_helper::flanking::{
    FlankDetector, FlankPair, IndicatorRegistry, Orchestrator, OverlayColor, PixelMapper,
    PixelPrimitive, Primitive,
};
use flank_helper::grid::{ReachModel, Square};
use flank_helper::scene::{load_scene, Alliance, Scene, Token, Viewer};

fn data_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(relative)
}

fn line_of_three() -> Scene {
    Scene::new(vec![
        Token::new("fighter", Square::new(0, 0), Alliance::Party),
        Token::new("rogue", Square::new(2, 0), Alliance::Party),
        Token::new("orc", Square::new(1, 0), Alliance::Opposition),
    ])
}

fn live_check(scene: &Scene, a: &str, b: &str, enemy: &str) -> bool {
    let detector = FlankDetector::new(ReachModel::default(), scene);
    let a = scene.find(a).unwrap();
    let b = scene.find(b).unwrap();
    let enemy = scene.find(enemy).unwrap();
    let pair = FlankPair::live(a, b).unwrap();
    detector.check(enemy, &pair).unwrap().flanked
}

// ============================================================================
// Geometry cases
// ============================================================================

#[test]
fn test_opposite_sides_flank() {
    let scene = line_of_three();
    assert!(live_check(&scene, "fighter", "rogue", "orc"));
    // Argument order does not matter
    assert!(live_check(&scene, "rogue", "fighter", "orc"));
}

#[test]
fn test_wall_between_allies_voids_flank() {
    let scene = line_of_three()
        .with_walls(vec![Edge::new(Point::new(1.5, -1.0), Point::new(1.5, 2.0))]);
    assert!(!live_check(&scene, "fighter", "rogue", "orc"));
}

#[test]
fn test_wall_elsewhere_is_ignored() {
    let scene = line_of_three()
        .with_walls(vec![Edge::new(Point::new(5.0, -1.0), Point::new(5.0, 2.0))]);
    assert!(live_check(&scene, "fighter", "rogue", "orc"));
}

#[test]
fn test_diagonal_flank_through_corners() {
    let scene = Scene::new(vec![
        Token::new("fighter", Square::new(0, 0), Alliance::Party),
        Token::new("rogue", Square::new(2, 2), Alliance::Party),
        Token::new("orc", Square::new(1, 1), Alliance::Opposition),
    ]);
    assert!(live_check(&scene, "fighter", "rogue", "orc"));
}

#[test]
fn test_same_side_is_not_a_flank() {
    let scene = Scene::new(vec![
        Token::new("fighter", Square::new(0, 0), Alliance::Party),
        Token::new("rogue", Square::new(0, 1), Alliance::Party),
        Token::new("orc", Square::new(1, 0), Alliance::Opposition),
    ]);
    assert!(!live_check(&scene, "fighter", "rogue", "orc"));
}

#[test]
fn test_out_of_reach_ally_is_not_a_flank() {
    let scene = Scene::new(vec![
        Token::new("fighter", Square::new(0, 0), Alliance::Party),
        Token::new("archer", Square::new(4, 0), Alliance::Party),
        Token::new("orc", Square::new(1, 0), Alliance::Opposition),
    ]);
    assert!(!live_check(&scene, "fighter", "archer", "orc"));

    let mut scene = scene;
    scene.tokens[1].reach = Some(15.0);
    assert!(live_check(&scene, "fighter", "archer", "orc"));
}

// ============================================================================
// Sample data
// ============================================================================

#[test]
fn test_sample_config_matches_defaults() {
    let config = load_config(&data_path("flank.toml")).unwrap();
    assert_eq!(config, FlankConfig::default());
}

#[test]
fn test_invalid_config_rejected() {
    assert!(parse_config("default_reach = -5.0").is_err());
    assert!(parse_config("auto_refresh_secs = \"soon\"").is_err());
}

#[test]
fn test_sample_scene_overlays() {
    let scene = load_scene(&data_path("scenes/skirmish.json")).unwrap();
    assert_eq!(scene.tokens.len(), 6);
    assert_eq!(scene.walls.len(), 1);

    let config = FlankConfig::default();
    let orchestrator = Orchestrator::for_scene(&scene, &config, Viewer::player());
    let fighter = scene.find("fighter").unwrap();
    let overlay = orchestrator.overlay_for(fighter).unwrap();

    // Fighter and rogue already stand on either side of the orc
    let orc = scene.find("orc").unwrap().reference_square().unwrap();
    assert!(overlay
        .lines()
        .any(|(from, to, c)| c == OverlayColor::FlankAchieved
            && from == Point::new(2.5, 2.5)
            && to == Point::new(4.5, 2.5)));
    assert!(overlay.primitives.iter().any(|p| matches!(
        p,
        Primitive::Outline { origin, color: OverlayColor::FlankAchieved, .. } if *origin == orc
    )));
    assert_eq!(overlay.count(OverlayColor::Candidate), 0);
}

#[test]
fn test_missing_scene_file_is_io_error() {
    let result = load_scene(&data_path("scenes/does_not_exist.json"));
    assert!(matches!(
        result,
        Err(flank_helper::core::error::FlankError::IoError(_))
    ));
}

// ============================================================================
// Registry and pixel output
// ============================================================================

#[test]
fn test_registry_recompute_is_idempotent() {
    let scene = load_scene(&data_path("scenes/skirmish.json")).unwrap();
    let config = FlankConfig::default();
    let mut registry = IndicatorRegistry::new();
    for token in scene.tokens.iter().filter(|t| t.alliance == Some(Alliance::Party)) {
        registry.toggle(token.id, true);
    }

    registry.recompute_all(&scene, &config, Viewer::player());
    let first = serde_json::to_string(&registry.overlays()).unwrap();
    registry.recompute_all(&scene, &config, Viewer::player());
    let second = serde_json::to_string(&registry.overlays()).unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.overlays().len(), 3);
}

#[test]
fn test_pixel_output_scales_by_grid_size() {
    let scene = line_of_three();
    let config = FlankConfig::default();
    let orchestrator = Orchestrator::for_scene(&scene, &config, Viewer::player());
    let overlay = orchestrator.overlay_for(&scene.tokens[0]).unwrap();

    let pixels = overlay.to_pixels(&PixelMapper::new(scene.grid_size));
    assert_eq!(pixels.len(), overlay.len());
    assert!(pixels.iter().any(|p| matches!(
        p,
        PixelPrimitive::Line { from, to, .. } if *from == Point::new(50.0, 50.0) && *to == Point::new(250.0, 50.0)
    )));
}
