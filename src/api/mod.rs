mod engine_accessors;
mod engine_config;
mod engine_init;
mod history_controller;
mod pointer_controller;
mod render_controller;
mod sync_controller;

pub use engine_config::AnnotationEngineConfig;
pub use pointer_controller::PointerResponse;

use crate::annotation::{ActionSink, AnnotationStore, CommandStack, ScreenCache};
use crate::core::ChartAxes;
use crate::interaction::{DragController, InteractionState};
use crate::render::{FrameScheduler, Renderer};
use crate::telemetry::Diagnostics;

/// Annotation interaction engine layered over a host chart widget.
///
/// The engine owns the annotation store, the undo/redo history and every
/// gesture state machine. The host feeds it pointer events, animation frames
/// and remote frames; it talks back through the renderer and the action sink.
/// Everything runs on the caller's thread and nothing blocks.
pub struct AnnotationEngine<R: Renderer, A: ChartAxes, S: ActionSink> {
    renderer: R,
    axes: A,
    sink: S,
    config: AnnotationEngineConfig,
    store: AnnotationStore,
    history: CommandStack,
    cache: ScreenCache,
    drag: DragController,
    interaction: InteractionState,
    scheduler: FrameScheduler,
    diagnostics: Diagnostics,
}
