//! Scheduling of indicator recomputation
//!
//! Recomputation itself is a synchronous pass over a snapshot; this module
//! only decides when it runs.

pub mod debounce;
pub mod schedule;
pub mod settle;

pub use debounce::{spawn_auto_refresh, AutoRefresh, Debouncer};
pub use schedule::recompute_when_settled;
pub use settle::{watch_until_settled, SettleState, SettleTracker};
