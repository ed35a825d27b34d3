use chart_annotations::annotation::{
    ActionBuffer, AnchorPoint, Annotation, AnnotationId, HitTarget, RemoteFrame, SnapConfig,
    WireAction,
};
use chart_annotations::core::{LinearChartAxes, PriceScale, TimeScale, Viewport};
use chart_annotations::interaction::{GestureState, PointerEvent};
use chart_annotations::render::NullRenderer;
use chart_annotations::telemetry::WarningCode;
use chart_annotations::{AnnotationEngine, AnnotationEngineConfig, AnnotationError};

type Engine = AnnotationEngine<NullRenderer, LinearChartAxes, ActionBuffer>;

// x = time / 10, y = 500 - price * 5
fn build_engine() -> Engine {
    let axes = LinearChartAxes::new(
        Viewport::new(1000, 500),
        TimeScale::new(0.0, 10_000.0).expect("time scale"),
        PriceScale::new(0.0, 100.0).expect("price scale"),
    );
    let config = AnnotationEngineConfig::default().with_snap(SnapConfig::disabled());
    AnnotationEngine::new(NullRenderer::default(), axes, ActionBuffer::new(), config)
        .expect("engine init")
}

fn line(id: &str, price: f64) -> Annotation {
    Annotation::horizontal_line(AnnotationId::new(id), AnchorPoint::new(0.0, price)).expect("line")
}

fn ids(engine: &Engine) -> Vec<String> {
    engine
        .store()
        .iter()
        .map(|annotation| annotation.id().to_string())
        .collect()
}

#[test]
fn confirm_appends_unknown_and_replaces_known_in_place() {
    let mut engine = build_engine();
    engine.set_all(vec![line("a", 10.0), line("b", 20.0)]).expect("set all");

    engine.confirm(line("c", 30.0)).expect("append");
    engine.confirm(line("a", 15.0)).expect("replace");

    assert_eq!(ids(&engine), vec!["a", "b", "c"]);
    assert_eq!(engine.store().get(&AnnotationId::new("a")), Some(&line("a", 15.0)));
    // reconciliation never echoes to the peer
    assert!(engine.sink().is_empty());
    assert!(engine.history().is_empty());
}

#[test]
fn confirm_keeps_selection_and_hover() {
    let mut engine = build_engine();
    engine.set_all(vec![line("a", 40.0)]).expect("set all");
    engine.select(&AnnotationId::new("a"));
    engine.handle_pointer_event(PointerEvent::moved(500.0, 300.0));
    engine.on_animation_frame().expect("frame");
    assert_eq!(engine.hovered(), Some(&HitTarget::body(AnnotationId::new("a"))));

    engine.confirm(line("a", 41.0)).expect("confirm");

    assert_eq!(engine.selected(), Some(&AnnotationId::new("a")));
    assert_eq!(engine.hovered(), Some(&HitTarget::body(AnnotationId::new("a"))));
    assert!(engine.is_frame_pending());
}

#[test]
fn set_all_prunes_selection_and_hover_of_removed_ids() {
    let mut engine = build_engine();
    engine.set_all(vec![line("a", 40.0), line("b", 20.0)]).expect("set all");
    engine.select(&AnnotationId::new("a"));
    engine.handle_pointer_event(PointerEvent::moved(500.0, 300.0));
    engine.on_animation_frame().expect("frame");

    engine.set_all(vec![line("b", 20.0)]).expect("set all");

    assert!(engine.selected().is_none());
    assert!(engine.hovered().is_none());
    assert_eq!(ids(&engine), vec!["b"]);
}

#[test]
fn set_all_cancels_a_drag_on_a_removed_annotation() {
    let mut engine = build_engine();
    engine.set_all(vec![line("a", 40.0)]).expect("set all");
    engine.handle_pointer_event(PointerEvent::down(500.0, 300.0));
    engine.handle_pointer_event(PointerEvent::moved(500.0, 250.0));
    assert_eq!(engine.gesture(), GestureState::Dragging);

    engine.set_all(Vec::new()).expect("set all");

    assert_eq!(engine.gesture(), GestureState::Idle);
    let up = engine.handle_pointer_event(PointerEvent::up(500.0, 250.0));
    assert!(!up.consumed);
    assert!(engine.history().is_empty());
}

#[test]
fn invalid_remote_payloads_are_rejected_without_mutation() {
    let mut engine = build_engine();
    engine.set_all(vec![line("a", 40.0)]).expect("set all");

    let err = engine
        .apply_remote_json(r#"{"type":"setAll","annotations":"nope"}"#)
        .expect_err("malformed frame");
    assert!(matches!(err, AnnotationError::RemoteFrame(_)));

    let err = engine
        .apply_remote_json(
            r#"{"type":"confirm","annotation":{"id":"x","kind":"trend-line","points":[{"time":1,"price":2}]}}"#,
        )
        .expect_err("wrong point count");
    assert!(matches!(err, AnnotationError::RemoteFrame(_)));

    assert_eq!(ids(&engine), vec!["a"]);
}

#[test]
fn remote_json_frames_drive_the_store() {
    let mut engine = build_engine();

    engine
        .apply_remote_json(
            r#"{"type":"setAll","annotations":[{"id":"a","kind":"horizontal-line","points":[{"time":0,"price":40}]}]}"#,
        )
        .expect("set all");
    engine
        .apply_remote_frame(RemoteFrame::Confirm {
            annotation: line("b", 20.0),
        })
        .expect("confirm");

    assert_eq!(ids(&engine), vec!["a", "b"]);
}

#[test]
fn undoing_an_update_whose_target_was_removed_remotely_recovers_it() {
    let mut engine = build_engine();
    engine.set_all(vec![line("a", 40.0)]).expect("set all");

    // drag the line down by 50px: price 40 -> 30
    engine.handle_pointer_event(PointerEvent::down(500.0, 300.0));
    engine.handle_pointer_event(PointerEvent::moved(500.0, 350.0));
    engine.handle_pointer_event(PointerEvent::up(500.0, 350.0));
    assert_eq!(engine.store().get(&AnnotationId::new("a")), Some(&line("a", 30.0)));
    engine.sink_mut().drain();

    engine.set_all(Vec::new()).expect("remote removal");
    assert!(engine.undo());

    assert_eq!(engine.store().get(&AnnotationId::new("a")), Some(&line("a", 40.0)));
    assert_eq!(
        engine.sink_mut().drain(),
        vec![WireAction::Update {
            annotation: line("a", 40.0)
        }]
    );
    let warnings = engine.diagnostics_mut().drain();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningCode::UpdateTargetMissing);
    assert_eq!(warnings[0].identity, "a");
}
