use tracing::{debug, trace};

use crate::annotation::{ActionSink, CoordinateMapper, hit_test};
use crate::core::{ChartAxes, Viewport};
use crate::error::{AnnotationError, AnnotationResult};
use crate::render::{RedrawReason, RedrawReasons, Renderer, SceneOptions, SceneState, build_scene};
use crate::telemetry::WarningCode;

use super::AnnotationEngine;

impl<R: Renderer, A: ChartAxes, S: ActionSink> AnnotationEngine<R, A, S> {
    /// Records a repaint trigger. Returns `true` when the host must request a
    /// new animation frame.
    pub fn request_redraw(&mut self, reason: RedrawReason) -> bool {
        self.scheduler.schedule(reason)
    }

    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    #[must_use]
    pub fn pending_redraw_reasons(&self) -> Option<RedrawReasons> {
        self.scheduler.pending()
    }

    /// Host notification that the visible range or price domain moved.
    pub fn on_visible_range_changed(&mut self) -> bool {
        self.cache.invalidate();
        self.interaction.mark_hover_stale();
        self.request_redraw(RedrawReason::ViewRange)
    }

    /// Reallocates the canvas buffer, hands the new size to the axes and
    /// forces a full repaint.
    ///
    /// Failure to allocate the buffer is fatal and leaves the axes untouched.
    pub fn resize(&mut self, viewport: Viewport, pixel_ratio: f64) -> AnnotationResult<bool> {
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(AnnotationError::InvalidData(
                "pixel ratio must be finite and > 0".to_owned(),
            ));
        }
        self.renderer.resize(viewport, pixel_ratio)?;
        self.axes.resize_viewport(viewport);
        debug!(width = viewport.width, height = viewport.height, pixel_ratio, "canvas resized");
        self.config.pixel_ratio = pixel_ratio;
        self.cache.invalidate();
        self.interaction.mark_hover_stale();
        Ok(self.request_redraw(RedrawReason::Resize))
    }

    /// Runs the pending repaint, if any.
    ///
    /// Rebuilds the screen cache, resolves hover once from the latest cursor,
    /// then paints every annotation, the draft and the selection handles.
    /// Returns whether a frame was rendered.
    pub fn on_animation_frame(&mut self) -> AnnotationResult<bool> {
        let Some(reasons) = self.scheduler.take() else {
            return Ok(false);
        };

        let mapper = CoordinateMapper::new(&self.axes, self.config.snap);
        self.cache.rebuild(&self.store, &mapper);

        if let Some(cursor) = self.interaction.take_stale_cursor() {
            if !self.gesture().is_active() {
                let hovered = hit_test(
                    cursor,
                    &self.store,
                    self.interaction.selected(),
                    &mapper,
                    &self.cache,
                    self.config.hit_tolerance_px,
                );
                self.interaction.set_hovered(hovered);
            }
        }

        let options = SceneOptions {
            style: self.config.scene_style,
            handle_radius_px: self.config.handle_radius_px,
            handle_hover_radius_px: self.config.handle_hover_radius_px,
            pixel_ratio: self.config.pixel_ratio,
        };
        let state = SceneState {
            store: &self.store,
            selected: self.interaction.selected(),
            hovered: self.interaction.hovered(),
            live: self.drag.live(),
        };
        let scene = build_scene(&state, &mapper, &options);
        trace!(
            ?reasons,
            lines = scene.frame.lines.len(),
            rects = scene.frame.rects.len(),
            circles = scene.frame.circles.len(),
            skipped = scene.skipped.len(),
            "annotation frame built"
        );

        for id in &scene.skipped {
            self.diagnostics.warn(
                WarningCode::RenderPointUnmappable,
                id.as_str(),
                "annotation has coordinates outside the resolvable range",
            );
        }
        self.renderer.render(&scene.frame)?;
        Ok(true)
    }
}
