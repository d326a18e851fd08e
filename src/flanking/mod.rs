//! Flanking engine
//!
//! Finds where allies could stand to flank an enemy, tests pairs of
//! placements for a flank, and turns the results into render primitives.
//! Everything here is a pure function of a scene snapshot and a config.

pub mod detector;
pub mod obstruction;
pub mod orchestrator;
pub mod overlay;
pub mod registry;
pub mod search;

pub use detector::{crosses_opposite_sides, is_flanking, FlankDetector, FlankPair, FlankResult, Flanker, ShownFlank};
pub use obstruction::{blocked, find_obstruction, EdgeSource};
pub use orchestrator::Orchestrator;
pub use overlay::{Overlay, OverlayColor, PixelMapper, PixelPrimitive, Primitive};
pub use registry::{IndicatorRegistry, IndicatorState};
pub use search::{can_place, positions_in_reach, Spiral, OUT_OF_REACH_LIMIT};
