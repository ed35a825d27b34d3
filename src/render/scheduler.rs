use serde::{Deserialize, Serialize};

/// Trigger that asked for an annotation repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedrawReason {
    Annotations,
    ViewRange,
    Resize,
    Hover,
    Gesture,
    Selection,
}

impl RedrawReason {
    const fn bit(self) -> u8 {
        match self {
            Self::Annotations => 1 << 0,
            Self::ViewRange => 1 << 1,
            Self::Resize => 1 << 2,
            Self::Hover => 1 << 3,
            Self::Gesture => 1 << 4,
            Self::Selection => 1 << 5,
        }
    }
}

/// Bitmask of reasons folded into one pending frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RedrawReasons {
    bits: u8,
}

impl RedrawReasons {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_reason(reason: RedrawReason) -> Self {
        Self { bits: reason.bit() }
    }

    #[must_use]
    pub const fn with_reason(self, reason: RedrawReason) -> Self {
        Self {
            bits: self.bits | reason.bit(),
        }
    }

    #[must_use]
    pub const fn contains(self, reason: RedrawReason) -> bool {
        (self.bits & reason.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    /// Reasons that move annotations on screen and so invalidate cached
    /// bounding boxes.
    #[must_use]
    pub const fn invalidates_geometry(self) -> bool {
        self.contains(RedrawReason::Annotations)
            || self.contains(RedrawReason::ViewRange)
            || self.contains(RedrawReason::Resize)
    }
}

/// Schedule-if-absent frame coalescing.
///
/// Any number of triggers between two animation frames collapse into a single
/// pending repaint. The host requests an animation frame only when `schedule`
/// returns `true`, and calls `take` from that frame's callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameScheduler {
    pending: Option<RedrawReasons>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending(&self) -> Option<RedrawReasons> {
        self.pending
    }

    /// Records `reason`; returns `true` when no frame was pending yet.
    pub fn schedule(&mut self, reason: RedrawReason) -> bool {
        match self.pending.as_mut() {
            Some(reasons) => {
                *reasons = reasons.with_reason(reason);
                false
            }
            None => {
                self.pending = Some(RedrawReasons::from_reason(reason));
                true
            }
        }
    }

    /// Consumes the pending frame, if any.
    pub fn take(&mut self) -> Option<RedrawReasons> {
        self.pending.take()
    }
}
