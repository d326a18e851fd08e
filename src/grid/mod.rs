//! Grid occupancy and reach
//!
//! Squares are integer cells; a token's footprint is the set of squares it
//! covers and its reach is a rectangular expansion of that footprint.

pub mod footprint;
pub mod reach;
pub mod square;

pub use footprint::Footprint;
pub use reach::ReachModel;
pub use square::{Square, SquareBounds};
