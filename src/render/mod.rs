mod frame;
mod null_renderer;
mod primitives;
mod scene;
mod scheduler;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{CirclePrimitive, Color, LinePrimitive, LineStrokeStyle, RectPrimitive};
pub use scene::{AnnotationScene, AnnotationSceneStyle, SceneOptions, SceneState, build_scene};
pub use scheduler::{FrameScheduler, RedrawReason, RedrawReasons};

use crate::core::Viewport;
use crate::error::AnnotationResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame`, so drawing code stays
/// isolated from annotation and interaction logic.
pub trait Renderer {
    /// Reallocates the canvas buffer. Failure means the host cannot provide a
    /// drawing surface and is not recoverable.
    fn resize(&mut self, viewport: Viewport, pixel_ratio: f64) -> AnnotationResult<()>;

    fn render(&mut self, frame: &RenderFrame) -> AnnotationResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
