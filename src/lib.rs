//! Flank Helper - flanking indicators for grid combat maps
//!
//! Given a snapshot of tokens and walls, computes which squares a token could
//! move to in order to flank an enemy together with an ally, and which flanks
//! are already in place.

pub mod core;
pub mod flanking;
pub mod grid;
pub mod refresh;
pub mod scene;
