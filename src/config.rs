//! Engine tuning parameters.
//!
//! The host application owns where these come from (a settings file, a
//! preferences pane); the engine only parses and validates them. Every field
//! has a default, so a partial JSON object is a valid configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    ANCHOR_RADIUS_PX, DEFAULT_SHAPE_SIZE, DEFAULT_TEXT_SIZE, HANDLE_RADIUS_PX, HISTORY_LIMIT, HIT_SLOP_PX,
    PASTE_OFFSET, WHEEL_ZOOM_SENSITIVITY,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// A `(width, height)` pair in diagram units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Maximum number of retained undo snapshots.
    pub history_limit: usize,
    /// Offset applied to pasted elements, in diagram units.
    pub paste_offset: f64,
    /// Resize handle half-size in screen pixels.
    pub handle_radius_px: f64,
    /// Anchor marker radius in screen pixels.
    pub anchor_radius_px: f64,
    /// Stroke hit slop in screen pixels.
    pub hit_slop_px: f64,
    /// Zoom factor per wheel pixel (`exp(-dy * sensitivity)`).
    pub wheel_zoom_sensitivity: f64,
    pub default_shape_size: Size,
    pub default_text_size: Size,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            paste_offset: PASTE_OFFSET,
            handle_radius_px: HANDLE_RADIUS_PX,
            anchor_radius_px: ANCHOR_RADIUS_PX,
            hit_slop_px: HIT_SLOP_PX,
            wheel_zoom_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            default_shape_size: DEFAULT_SHAPE_SIZE.into(),
            default_text_size: DEFAULT_TEXT_SIZE.into(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON settings object. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Invalid` when a value fails validation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(invalid("historyLimit", "must be at least 1"));
        }
        for (field, value) in [
            ("handleRadiusPx", self.handle_radius_px),
            ("anchorRadiusPx", self.anchor_radius_px),
            ("hitSlopPx", self.hit_slop_px),
            ("wheelZoomSensitivity", self.wheel_zoom_sensitivity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive number, got {value}")));
            }
        }
        if !self.paste_offset.is_finite() {
            return Err(invalid("pasteOffset", "must be finite"));
        }
        for (field, size) in [("defaultShapeSize", self.default_shape_size), ("defaultTextSize", self.default_text_size)]
        {
            if !(size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0) {
                return Err(invalid(field, format!("must be positive, got {}x{}", size.width, size.height)));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}
