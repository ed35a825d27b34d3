use crate::core::Viewport;
use crate::error::AnnotationResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced, and keeps the last frame for inspection.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub resize_count: usize,
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_circle_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn resize(&mut self, viewport: Viewport, _pixel_ratio: f64) -> AnnotationResult<()> {
        if !viewport.is_valid() {
            return Err(crate::error::AnnotationError::RenderContextUnavailable(
                format!(
                    "cannot allocate a {}x{} canvas buffer",
                    viewport.width, viewport.height
                ),
            ));
        }
        self.resize_count += 1;
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> AnnotationResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_circle_count = frame.circles.len();
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
