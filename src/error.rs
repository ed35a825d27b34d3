use thiserror::Error;

pub type AnnotationResult<T> = Result<T, AnnotationError>;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid annotation `{id}`: {reason}")]
    InvalidAnnotation { id: String, reason: String },

    /// The host cannot provide a drawable surface. Never retried.
    #[error("render context unavailable: {0}")]
    RenderContextUnavailable(String),

    #[error("malformed remote frame: {0}")]
    RemoteFrame(#[from] serde_json::Error),
}
