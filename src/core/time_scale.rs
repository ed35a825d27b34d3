use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, Viewport};
use crate::error::{AnnotationError, AnnotationResult};

/// Time axis model over millisecond timestamps.
///
/// Only the visible range is tracked: the host chart owns fitting, panning
/// and zooming, this type mirrors whatever range it reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    visible_start: f64,
    visible_end: f64,
}

impl TimeScale {
    pub fn new(time_start_ms: f64, time_end_ms: f64) -> AnnotationResult<Self> {
        let normalized = normalize_range(time_start_ms, time_end_ms, 1.0)?;
        Ok(Self {
            visible_start: normalized.0,
            visible_end: normalized.1,
        })
    }

    #[must_use]
    pub fn visible_range(self) -> (f64, f64) {
        (self.visible_start, self.visible_end)
    }

    #[must_use]
    pub fn contains(self, time_ms: f64) -> bool {
        (self.visible_start..=self.visible_end).contains(&time_ms)
    }

    pub fn set_visible_range(&mut self, start_ms: f64, end_ms: f64) -> AnnotationResult<()> {
        let normalized = normalize_range(start_ms, end_ms, 1e-9)?;
        self.visible_start = normalized.0;
        self.visible_end = normalized.1;
        Ok(())
    }

    /// Pans the visible range by an additive time delta.
    pub fn pan_visible_by_delta(&mut self, delta_ms: f64) -> AnnotationResult<()> {
        if !delta_ms.is_finite() {
            return Err(AnnotationError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        self.visible_start += delta_ms;
        self.visible_end += delta_ms;
        Ok(())
    }

    pub fn time_to_pixel(self, time_ms: f64, viewport: Viewport) -> AnnotationResult<f64> {
        self.visible_linear()?
            .domain_to_pixel(time_ms, f64::from(viewport.width))
    }

    pub fn pixel_to_time(self, pixel: f64, viewport: Viewport) -> AnnotationResult<f64> {
        self.visible_linear()?
            .pixel_to_domain(pixel, f64::from(viewport.width))
    }

    fn visible_linear(self) -> AnnotationResult<LinearScale> {
        LinearScale::new(self.visible_start, self.visible_end)
    }
}

pub(crate) fn normalize_range(start: f64, end: f64, min_span: f64) -> AnnotationResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(AnnotationError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}
