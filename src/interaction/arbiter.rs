//! Per-event routing between the annotation layer and the host chart.
//!
//! `decide` is a pure function of the event and a snapshot of engine state;
//! the engine applies the returned route. A consumed event must not reach the
//! host chart widget.

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationId, AnnotationKind, HitTarget};
use crate::interaction::{GestureState, PointerEvent, PointerEventKind, Tool};

/// Hit-test result as seen by the arbiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterHit {
    pub target: HitTarget,
    pub locked: bool,
}

/// Engine state the decision depends on.
///
/// `hit` is only consulted for pointer-down while idle; callers may leave it
/// empty for every other event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArbiterContext {
    pub gesture: GestureState,
    pub tool: Option<Tool>,
    pub hit: Option<ArbiterHit>,
    pub has_selection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArbiterRoute {
    ContinueDraft,
    ContinueDrag,
    CommitDraft,
    CommitDrag,
    /// Cancel any active draft or drag without a command.
    Abort,
    /// Consumed with no effect (second pointer-down mid-gesture, erasing a
    /// locked annotation).
    Ignore,
    StartDraft(AnnotationKind),
    Erase(AnnotationId),
    /// Select the hit and start dragging it.
    StartDrag(HitTarget),
    /// Select without dragging (locked annotations).
    Select(AnnotationId),
    ClearSelection,
    Hover,
    ClearHover,
    PassThrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterDecision {
    pub consumed: bool,
    pub route: ArbiterRoute,
    /// Gesture state once the route has been applied.
    pub next: GestureState,
}

impl ArbiterDecision {
    fn consume(route: ArbiterRoute, next: GestureState) -> Self {
        Self {
            consumed: true,
            route,
            next,
        }
    }

    fn pass(route: ArbiterRoute, next: GestureState) -> Self {
        Self {
            consumed: false,
            route,
            next,
        }
    }
}

#[must_use]
pub fn decide(event: &PointerEvent, ctx: &ArbiterContext) -> ArbiterDecision {
    use ArbiterRoute as R;
    use GestureState as G;
    use PointerEventKind as K;

    match (ctx.gesture, event.kind) {
        (_, K::Cancel) => ArbiterDecision::consume(R::Abort, G::Idle),

        (G::Drafting, K::Move) => ArbiterDecision::consume(R::ContinueDraft, G::Drafting),
        (G::Drafting, K::Up) => ArbiterDecision::consume(R::CommitDraft, G::Idle),
        (G::Dragging, K::Move) => ArbiterDecision::consume(R::ContinueDrag, G::Dragging),
        (G::Dragging, K::Up) => ArbiterDecision::consume(R::CommitDrag, G::Idle),
        (gesture @ (G::Drafting | G::Dragging), K::Down | K::Leave) => {
            ArbiterDecision::consume(R::Ignore, gesture)
        }

        (G::Idle, K::Down) => decide_idle_down(ctx),
        (G::Idle, K::Move) => ArbiterDecision::pass(R::Hover, G::Idle),
        (G::Idle, K::Up) => ArbiterDecision::pass(R::PassThrough, G::Idle),
        (G::Idle, K::Leave) => ArbiterDecision::pass(R::ClearHover, G::Idle),
    }
}

fn decide_idle_down(ctx: &ArbiterContext) -> ArbiterDecision {
    use ArbiterRoute as R;
    use GestureState as G;

    match (ctx.tool, &ctx.hit) {
        (Some(Tool::Eraser), Some(hit)) if hit.locked => ArbiterDecision::consume(R::Ignore, G::Idle),
        (Some(Tool::Eraser), Some(hit)) => {
            ArbiterDecision::consume(R::Erase(hit.target.id.clone()), G::Idle)
        }
        (Some(Tool::Eraser), None) => ArbiterDecision::pass(R::PassThrough, G::Idle),
        (Some(tool), _) => {
            let Some(kind) = tool.annotation_kind() else {
                return ArbiterDecision::pass(R::PassThrough, G::Idle);
            };
            let next = if kind.point_count() == 1 {
                G::Idle
            } else {
                G::Drafting
            };
            ArbiterDecision::consume(R::StartDraft(kind), next)
        }
        (None, Some(hit)) if hit.locked => {
            ArbiterDecision::consume(R::Select(hit.target.id.clone()), G::Idle)
        }
        (None, Some(hit)) => ArbiterDecision::consume(R::StartDrag(hit.target.clone()), G::Dragging),
        (None, None) if ctx.has_selection => ArbiterDecision::pass(R::ClearSelection, G::Idle),
        (None, None) => ArbiterDecision::pass(R::PassThrough, G::Idle),
    }
}
