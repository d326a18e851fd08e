//! Flank helper configuration with documented constants
//!
//! Every recomputation receives the config explicitly; there is no global
//! settings lookup. Values can be loaded from a TOML file, and any field left
//! out falls back to its default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{FlankError, Result};

/// Configuration for flank indicator computation and refresh scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlankConfig {
    // === REFRESH ===
    /// Seconds between periodic recomputations of every indicator
    ///
    /// The host cannot report every relevant state change (toggled attack
    /// options, conditions applied by drag-and-drop), so a periodic pass
    /// catches what events miss. 0 disables it.
    pub auto_refresh_secs: u64,

    /// Delay before a UI-triggered recomputation runs (milliseconds)
    ///
    /// Requests arriving inside this window supersede the pending one.
    pub update_delay_ms: u64,

    /// Interval between movement settle checks (milliseconds)
    ///
    /// At 200ms some animations had not finished; 300ms catches most.
    pub settle_interval_ms: u64,

    /// Consecutive unchanged observations before a moving token counts as settled
    pub settle_checks: u32,

    // === CONDITIONS ===
    /// Skip the acting token entirely when its own conditions forbid flanking
    pub self_conditions_prevent_flanking: bool,

    /// Skip allies whose conditions forbid flanking
    pub others_conditions_prevent_flanking: bool,

    // === GRID ===
    /// Length units covered by one grid square
    ///
    /// Reach distances are divided by this and floored to whole squares.
    pub length_per_square: f64,

    /// Reach assumed for tokens with no resolvable reach source (length units)
    ///
    /// The default equals one square: plain melee reach.
    pub default_reach: f64,

    // === DIAGNOSTICS ===
    /// Emit candidate-square dots and blocking walls, and log per-pass details
    pub debug: bool,
}

impl Default for FlankConfig {
    fn default() -> Self {
        Self {
            auto_refresh_secs: 5,
            update_delay_ms: 50,
            settle_interval_ms: 300,
            settle_checks: 1,

            self_conditions_prevent_flanking: false,
            others_conditions_prevent_flanking: false,

            length_per_square: 5.0,
            default_reach: 5.0,

            debug: false,
        }
    }
}

impl FlankConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.length_per_square.is_finite() && self.length_per_square > 0.0) {
            return Err(FlankError::InvalidConfig(format!(
                "length_per_square ({}) must be a positive number",
                self.length_per_square
            )));
        }

        if !(self.default_reach.is_finite() && self.default_reach >= 0.0) {
            return Err(FlankError::InvalidConfig(format!(
                "default_reach ({}) must be non-negative",
                self.default_reach
            )));
        }

        if self.settle_checks == 0 {
            return Err(FlankError::InvalidConfig(
                "settle_checks must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Periodic refresh interval, or `None` when disabled
    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        (self.auto_refresh_secs > 0).then(|| Duration::from_secs(self.auto_refresh_secs))
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }
}

/// Parse and validate a config from TOML text
pub fn parse_config(contents: &str) -> Result<FlankConfig> {
    let config: FlankConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file
pub fn load_config(path: &Path) -> Result<FlankConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}
