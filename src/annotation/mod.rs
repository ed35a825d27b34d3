pub mod command;
pub mod geometry;
pub mod mapper;
pub mod model;
pub mod store;
pub mod sync;

pub use command::{ApplyOutcome, Command, CommandStack, DEFAULT_HISTORY_LIMIT};
pub use geometry::{
    Aabb, DEFAULT_HANDLE_HOVER_RADIUS_PX, DEFAULT_HANDLE_RADIUS_PX, DEFAULT_HIT_TOLERANCE_PX,
};
pub use hit_test::{HitTarget, ScreenCache, hit_handle, hit_test};
pub use mapper::{CoordinateMapper, SnapConfig, SnapMode};
pub use model::{AnchorPoint, AnchorPoints, Annotation, AnnotationId, AnnotationKind, AnnotationStyle};
pub use store::{AnnotationStore, ReplaceOutcome};
pub use sync::{ActionBuffer, ActionSink, RemoteFrame, WireAction};
