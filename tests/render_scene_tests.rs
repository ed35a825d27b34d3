use chart_annotations::annotation::{
    AnchorPoint, Annotation, AnnotationId, AnnotationKind, AnnotationStore, AnnotationStyle,
    CoordinateMapper, HitTarget, SnapConfig,
};
use chart_annotations::core::{LinearChartAxes, PriceScale, TimeScale, Viewport};
use chart_annotations::interaction::begin_draft;
use chart_annotations::render::{
    AnnotationSceneStyle, Color, FrameScheduler, LineStrokeStyle, RedrawReason, SceneOptions,
    SceneState, build_scene,
};

// x = time / 10, y = 500 - price * 5
fn axes() -> LinearChartAxes {
    LinearChartAxes::new(
        Viewport::new(1000, 500),
        TimeScale::new(0.0, 10_000.0).expect("time scale"),
        PriceScale::new(0.0, 100.0).expect("price scale"),
    )
    .with_visible_clipping(true)
}

fn options() -> SceneOptions {
    SceneOptions {
        style: AnnotationSceneStyle::default(),
        handle_radius_px: 4.0,
        handle_hover_radius_px: 6.0,
        pixel_ratio: 2.0,
    }
}

fn id(value: &str) -> AnnotationId {
    AnnotationId::new(value)
}

fn store() -> AnnotationStore {
    AnnotationStore::from_annotations(vec![
        Annotation::horizontal_line(id("h"), AnchorPoint::new(0.0, 40.0)).expect("line"),
        Annotation::trend_line(
            id("t"),
            AnchorPoint::new(1_000.0, 50.0),
            AnchorPoint::new(3_000.0, 60.0),
        )
        .expect("trend"),
        Annotation::rectangle(
            id("r"),
            AnchorPoint::new(5_000.0, 80.0),
            AnchorPoint::new(7_000.0, 20.0),
        )
        .expect("rect"),
    ])
}

#[test]
fn stored_annotations_map_to_primitives_in_draw_order() {
    let axes = axes();
    let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
    let store = store();
    let state = SceneState {
        store: &store,
        selected: None,
        hovered: None,
        live: None,
    };

    let scene = build_scene(&state, &mapper, &options());
    let style = AnnotationSceneStyle::default();

    assert!(scene.skipped.is_empty());
    assert_eq!(scene.frame.pixel_ratio, 2.0);
    assert_eq!(scene.frame.lines.len(), 2);
    let line = scene.frame.lines[0];
    assert_eq!((line.x1, line.y1, line.x2, line.y2), (0.0, 300.0, 1000.0, 300.0));
    assert_eq!(line.color, style.stroke_color);
    let trend = scene.frame.lines[1];
    assert_eq!((trend.x1, trend.y1, trend.x2, trend.y2), (100.0, 250.0, 300.0, 200.0));

    let rect = scene.frame.rects[0];
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (500.0, 100.0, 200.0, 300.0));
    assert_eq!(rect.fill_color, style.stroke_color.with_alpha(style.rect_fill_alpha));
    assert_eq!(rect.border_color, style.stroke_color);
    assert!(scene.frame.circles.is_empty());
    scene.frame.validate().expect("valid frame");
}

#[test]
fn selection_hover_and_own_colors_are_prioritized() {
    let axes = axes();
    let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
    let own = Color::rgb(0.2, 0.8, 0.2);
    let mut store = store();
    let restyled = store
        .get(&id("h"))
        .expect("line")
        .clone()
        .with_style(AnnotationStyle::default().with_color(own).with_stroke_width(3.0));
    store.insert(restyled);
    let hovered = HitTarget::handle(id("t"), 1);
    let state = SceneState {
        store: &store,
        selected: Some(&id("r")),
        hovered: Some(&hovered),
        live: None,
    };

    let scene = build_scene(&state, &mapper, &options());
    let style = AnnotationSceneStyle::default();

    assert_eq!(scene.frame.lines[0].color, own);
    assert_eq!(scene.frame.lines[0].stroke_width, 3.0);
    assert_eq!(scene.frame.lines[1].color, style.hovered_color);
    assert_eq!(scene.frame.rects[0].border_color, style.selected_color);

    // handles belong to the selection only
    assert_eq!(scene.frame.circles.len(), 2);
    assert!(scene.frame.circles.iter().all(|circle| circle.radius == 4.0));
    assert_eq!((scene.frame.circles[0].x, scene.frame.circles[0].y), (500.0, 100.0));
}

#[test]
fn hovered_handle_grows() {
    let axes = axes();
    let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
    let store = store();
    let hovered = HitTarget::handle(id("t"), 1);
    let state = SceneState {
        store: &store,
        selected: Some(&id("t")),
        hovered: Some(&hovered),
        live: None,
    };

    let scene = build_scene(&state, &mapper, &options());

    let radii: Vec<f64> = scene.frame.circles.iter().map(|circle| circle.radius).collect();
    assert_eq!(radii, vec![4.0, 6.0]);
}

#[test]
fn live_drag_geometry_overrides_stored_geometry() {
    let axes = axes();
    let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
    let store = store();
    let live = Annotation::trend_line(
        id("t"),
        AnchorPoint::new(2_000.0, 50.0),
        AnchorPoint::new(4_000.0, 60.0),
    )
    .expect("live");
    let state = SceneState {
        store: &store,
        selected: Some(&id("t")),
        hovered: None,
        live: Some(&live),
    };

    let scene = build_scene(&state, &mapper, &options());

    let trend = scene.frame.lines[1];
    assert_eq!((trend.x1, trend.x2), (200.0, 400.0));
    assert_eq!(scene.frame.circles[0].x, 200.0);
}

#[test]
fn draft_is_painted_dashed_after_committed_annotations() {
    let axes = axes();
    let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
    let mut store = AnnotationStore::new();
    begin_draft(
        &mut store,
        AnnotationKind::TrendLine,
        Some(AnchorPoint::new(1_000.0, 50.0)),
        AnnotationStyle::default(),
    );
    let state = SceneState {
        store: &store,
        selected: None,
        hovered: None,
        live: None,
    };

    let scene = build_scene(&state, &mapper, &options());
    let style = AnnotationSceneStyle::default();

    assert_eq!(scene.frame.lines.len(), 1);
    assert_eq!(scene.frame.lines[0].color, style.draft_color);
    assert_eq!(
        scene.frame.lines[0].stroke_style,
        LineStrokeStyle::Dashed {
            dash_px: 6.0,
            gap_px: 4.0
        }
    );
}

#[test]
fn unmappable_annotations_are_skipped_without_aborting_the_frame() {
    let axes = axes();
    let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
    let mut store = store();
    store.insert(
        Annotation::trend_line(
            id("off"),
            AnchorPoint::new(9_000.0, 50.0),
            AnchorPoint::new(20_000.0, 60.0),
        )
        .expect("offscreen trend"),
    );
    let state = SceneState {
        store: &store,
        selected: Some(&id("off")),
        hovered: None,
        live: None,
    };

    let scene = build_scene(&state, &mapper, &options());

    assert_eq!(scene.skipped, vec![id("off")]);
    assert_eq!(scene.frame.lines.len(), 2);
    assert_eq!(scene.frame.rects.len(), 1);
    assert_eq!(scene.frame.circles.len(), 1);
}

#[test]
fn scheduler_coalesces_reasons_into_one_frame() {
    let mut scheduler = FrameScheduler::new();

    assert!(scheduler.schedule(RedrawReason::Hover));
    assert!(!scheduler.schedule(RedrawReason::ViewRange));
    assert!(scheduler.is_pending());

    let reasons = scheduler.take().expect("pending frame");
    assert!(reasons.contains(RedrawReason::Hover));
    assert!(reasons.contains(RedrawReason::ViewRange));
    assert!(!reasons.contains(RedrawReason::Resize));
    assert!(reasons.invalidates_geometry());
    assert_eq!(scheduler.take(), None);
}

#[test]
fn primitive_with_overflowing_extent_is_skipped_alone() {
    let axes = LinearChartAxes::new(
        Viewport::new(1000, 500),
        TimeScale::new(0.0, 10_000.0).expect("time scale"),
        PriceScale::new(0.0, 100.0).expect("price scale"),
    );
    let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
    let mut annotations = store().to_vec();
    annotations.push(
        Annotation::rectangle(
            id("huge"),
            AnchorPoint::new(1_000.0, 3.0e307),
            AnchorPoint::new(2_000.0, -3.0e307),
        )
        .expect("rect"),
    );
    let store = AnnotationStore::from_annotations(annotations);
    let huge = id("huge");
    let state = SceneState {
        store: &store,
        selected: Some(&huge),
        hovered: None,
        live: None,
    };

    let scene = build_scene(&state, &mapper, &options());

    assert_eq!(scene.skipped, vec![huge.clone()]);
    assert_eq!(scene.frame.lines.len(), 2);
    assert_eq!(scene.frame.rects.len(), 1);
    assert_eq!(scene.frame.circles.len(), 2);
    assert!(scene.frame.validate().is_ok());
}
