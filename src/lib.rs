//! chart-annotations: interactive annotation layer for candlestick charts.
//!
//! Users place, select, drag and erase horizontal lines, trend lines and
//! rectangles on the price/time canvas of a host chart widget. Every edit is
//! applied locally first, recorded for undo/redo and mirrored to a remote
//! peer without waiting for acknowledgement.

pub mod annotation;
pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{AnnotationEngine, AnnotationEngineConfig, PointerResponse};
pub use error::{AnnotationError, AnnotationResult};
