use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::annotation::{
    AnnotationStyle, DEFAULT_HANDLE_HOVER_RADIUS_PX, DEFAULT_HANDLE_RADIUS_PX,
    DEFAULT_HISTORY_LIMIT, DEFAULT_HIT_TOLERANCE_PX, SnapConfig,
};
use crate::error::{AnnotationError, AnnotationResult};
use crate::render::AnnotationSceneStyle;
use crate::telemetry::DEFAULT_WARNING_INTERVAL;

/// Public engine bootstrap configuration.
///
/// Every field has a default, so hosts can persist a partial JSON document
/// and load it back without inventing their own format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEngineConfig {
    #[serde(default = "default_hit_tolerance_px")]
    pub hit_tolerance_px: f64,
    #[serde(default = "default_handle_radius_px")]
    pub handle_radius_px: f64,
    #[serde(default = "default_handle_hover_radius_px")]
    pub handle_hover_radius_px: f64,
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default = "default_warning_interval_ms")]
    pub warning_interval_ms: u64,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
    /// Style given to newly drafted annotations.
    #[serde(default)]
    pub default_style: AnnotationStyle,
    #[serde(default)]
    pub scene_style: AnnotationSceneStyle,
}

impl Default for AnnotationEngineConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: default_hit_tolerance_px(),
            handle_radius_px: default_handle_radius_px(),
            handle_hover_radius_px: default_handle_hover_radius_px(),
            snap: SnapConfig::default(),
            warning_interval_ms: default_warning_interval_ms(),
            history_limit: default_history_limit(),
            pixel_ratio: default_pixel_ratio(),
            default_style: AnnotationStyle::default(),
            scene_style: AnnotationSceneStyle::default(),
        }
    }
}

impl AnnotationEngineConfig {
    #[must_use]
    pub fn with_snap(mut self, snap: SnapConfig) -> Self {
        self.snap = snap;
        self
    }

    #[must_use]
    pub fn with_hit_tolerance_px(mut self, hit_tolerance_px: f64) -> Self {
        self.hit_tolerance_px = hit_tolerance_px;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    #[must_use]
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    #[must_use]
    pub fn with_default_style(mut self, style: AnnotationStyle) -> Self {
        self.default_style = style;
        self
    }

    #[must_use]
    pub fn warning_interval(&self) -> Duration {
        Duration::from_millis(self.warning_interval_ms)
    }

    pub fn validate(&self) -> AnnotationResult<()> {
        for (name, value) in [
            ("hit_tolerance_px", self.hit_tolerance_px),
            ("handle_radius_px", self.handle_radius_px),
            ("handle_hover_radius_px", self.handle_hover_radius_px),
            ("pixel_ratio", self.pixel_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnnotationError::InvalidData(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        if self.history_limit == 0 {
            return Err(AnnotationError::InvalidData(
                "`history_limit` must be > 0".to_owned(),
            ));
        }
        self.snap.validate()?;
        self.default_style.validate()?;
        self.scene_style.validate()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> AnnotationResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| AnnotationError::InvalidData(format!("failed to serialize config: {err}")))
    }

    pub fn from_json_str(input: &str) -> AnnotationResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| AnnotationError::InvalidData(format!("failed to parse config: {err}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_hit_tolerance_px() -> f64 {
    DEFAULT_HIT_TOLERANCE_PX
}

fn default_handle_radius_px() -> f64 {
    DEFAULT_HANDLE_RADIUS_PX
}

fn default_handle_hover_radius_px() -> f64 {
    DEFAULT_HANDLE_HOVER_RADIUS_PX
}

fn default_warning_interval_ms() -> u64 {
    DEFAULT_WARNING_INTERVAL.as_millis() as u64
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_pixel_ratio() -> f64 {
    1.0
}
