use tracing::debug;

use crate::annotation::{ActionSink, AnnotationStore, CommandStack, ScreenCache};
use crate::core::ChartAxes;
use crate::error::{AnnotationError, AnnotationResult};
use crate::interaction::{DragController, InteractionState};
use crate::render::{FrameScheduler, RedrawReason, Renderer};
use crate::telemetry::Diagnostics;

use super::{AnnotationEngine, AnnotationEngineConfig};

impl<R: Renderer, A: ChartAxes, S: ActionSink> AnnotationEngine<R, A, S> {
    /// Creates an engine with an empty store and allocates the canvas buffer.
    ///
    /// Fails when the config is invalid or the renderer cannot provide a
    /// drawing surface for the host's current viewport; neither is retried.
    pub fn new(
        mut renderer: R,
        axes: A,
        sink: S,
        config: AnnotationEngineConfig,
    ) -> AnnotationResult<Self> {
        config.validate()?;

        let viewport = axes.viewport();
        if !viewport.is_valid() {
            return Err(AnnotationError::RenderContextUnavailable(format!(
                "host canvas has no drawable area ({}x{})",
                viewport.width, viewport.height
            )));
        }
        renderer.resize(viewport, config.pixel_ratio)?;
        debug!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = config.pixel_ratio,
            "annotation engine initialized"
        );

        let mut scheduler = FrameScheduler::new();
        scheduler.schedule(RedrawReason::Resize);

        Ok(Self {
            renderer,
            axes,
            sink,
            config,
            store: AnnotationStore::new(),
            history: CommandStack::with_limit(config.history_limit),
            cache: ScreenCache::new(),
            drag: DragController::new(),
            interaction: InteractionState::default(),
            scheduler,
            diagnostics: Diagnostics::new(config.warning_interval()),
        })
    }
}
