#![forbid(unsafe_code)]

//! Engine configuration as data.
//!
//! [`EngineConfig`] captures every tunable of the drag engine. Defaults are the
//! product constants, so `EngineConfig::default()` behaves exactly like a
//! hardcoded build.
//!
//! # Loading
//!
//! ```toml
//! # tilegrid.toml
//! long_press_threshold_ms = 300
//! move_tolerance_before_hold = 20.0
//! outside_bottom_margin_px = 60.0
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("tilegrid.toml")?;
//! let config = EngineConfig::from_json_str(json)?;
//! ```

#[cfg(feature = "config-files")]
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gesture::HoldConfig;

/// Placeholder name given to a folder created by dropping one tile on another.
pub const DEFAULT_FOLDER_NAME: &str = "New Folder";

/// Tunables for hold recognition, hover detection, and folder policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stationary time before a press becomes a drag (default: 300).
    pub long_press_threshold_ms: u64,
    /// Travel allowed while pending before the press is dropped (default: 20).
    pub move_tolerance_before_hold: f32,
    /// Distance above the folder container that counts as outside.
    /// `None` uses one item height.
    pub outside_top_margin_px: Option<f32>,
    /// A dragged tile whose top passes `container_height - this` is outside
    /// (default: 60).
    pub outside_bottom_margin_px: f32,
    /// Edge bias used when picking the insertion cell (default: 5).
    pub hover_edge_tolerance_px: f32,
    /// Tiles per page in a paginated folder view (default: 9).
    pub folder_page_size: usize,
    /// Deepest container level a merge may create; the main grid is level 1
    /// (default: 2).
    pub max_nesting_depth: usize,
    /// Name given to a folder freshly created by a merge.
    pub default_folder_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            long_press_threshold_ms: 300,
            move_tolerance_before_hold: 20.0,
            outside_top_margin_px: None,
            outside_bottom_margin_px: 60.0,
            hover_edge_tolerance_px: 5.0,
            folder_page_size: 9,
            max_nesting_depth: 2,
            default_folder_name: DEFAULT_FOLDER_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.long_press_threshold_ms == 0 {
            errors.push("long_press_threshold_ms must be > 0".to_string());
        }
        if !self.move_tolerance_before_hold.is_finite() || self.move_tolerance_before_hold < 0.0 {
            errors.push(format!(
                "move_tolerance_before_hold must be finite and >= 0, got {}",
                self.move_tolerance_before_hold
            ));
        }
        if let Some(top) = self.outside_top_margin_px
            && (!top.is_finite() || top < 0.0)
        {
            errors.push(format!(
                "outside_top_margin_px must be finite and >= 0, got {top}"
            ));
        }
        if !self.outside_bottom_margin_px.is_finite() {
            errors.push("outside_bottom_margin_px must be finite".to_string());
        }
        if !self.hover_edge_tolerance_px.is_finite() || self.hover_edge_tolerance_px < 0.0 {
            errors.push(format!(
                "hover_edge_tolerance_px must be finite and >= 0, got {}",
                self.hover_edge_tolerance_px
            ));
        }
        if self.folder_page_size == 0 {
            errors.push("folder_page_size must be > 0".to_string());
        }
        if self.max_nesting_depth == 0 {
            errors.push("max_nesting_depth must be >= 1".to_string());
        }
        if self.default_folder_name.trim().is_empty() {
            errors.push("default_folder_name must not be blank".to_string());
        }

        errors
    }

    #[must_use]
    pub fn long_press_threshold(&self) -> Duration {
        Duration::from_millis(self.long_press_threshold_ms)
    }

    /// Outside-top distance for a grid whose tiles are `item_height` tall.
    #[must_use]
    pub fn outside_top_margin(&self, item_height: f32) -> f32 {
        self.outside_top_margin_px.unwrap_or(item_height)
    }

    /// Recognizer thresholds derived from this config.
    #[must_use]
    pub fn hold_config(&self) -> HoldConfig {
        HoldConfig {
            long_press_threshold: self.long_press_threshold(),
            move_tolerance: self.move_tolerance_before_hold,
        }
    }
}

/// Errors that can occur when loading an engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-files")]
    #[error("config TOML parse error: {0}")]
    Toml(toml::de::Error),

    #[cfg(feature = "config-files")]
    #[error("config JSON parse error: {0}")]
    Json(serde_json::Error),
}
