use chart_annotations::AnnotationError;
use chart_annotations::core::{
    ChartAxes, LinearChartAxes, LinearScale, OhlcBar, PriceScale, TimeScale, Viewport,
};

#[test]
fn scale_round_trip_within_tolerance() {
    let scale = LinearScale::new(10.0, 110.0).expect("valid scale");

    let original = 42.5;
    let px = scale.domain_to_pixel(original, 1000.0).expect("to pixel");
    let recovered = scale.pixel_to_domain(px, 1000.0).expect("from pixel");

    assert!((recovered - original).abs() <= 1e-9);
}

#[test]
fn zero_extent_is_rejected() {
    let scale = LinearScale::new(0.0, 1.0).expect("valid scale");
    assert!(scale.domain_to_pixel(0.5, 0.0).is_err());
    assert!(LinearScale::new(3.0, 3.0).is_err());
}

#[test]
fn time_scale_round_trip_within_tolerance() {
    let viewport = Viewport::new(1200, 600);
    let scale = TimeScale::new(1_700_000_000_000.0, 1_700_000_600_000.0).expect("valid scale");

    let original = 1_700_000_123_000.0;
    let px = scale.time_to_pixel(original, viewport).expect("to pixel");
    let recovered = scale.pixel_to_time(px, viewport).expect("from pixel");

    assert!((recovered - original).abs() <= 1e-3);
}

#[test]
fn time_scale_visible_range_controls_mapping() {
    let viewport = Viewport::new(1000, 600);
    let mut scale = TimeScale::new(0.0, 10.0).expect("valid scale");
    scale.set_visible_range(2.0, 6.0).expect("set visible range");

    assert_eq!(scale.time_to_pixel(2.0, viewport).expect("left"), 0.0);
    assert_eq!(scale.time_to_pixel(6.0, viewport).expect("right"), 1000.0);
}

#[test]
fn price_scale_is_inverted() {
    let viewport = Viewport::new(800, 400);
    let scale = PriceScale::new(0.0, 100.0).expect("valid scale");

    assert_eq!(scale.price_to_pixel(100.0, viewport).expect("top"), 0.0);
    assert_eq!(scale.price_to_pixel(0.0, viewport).expect("bottom"), 400.0);
    assert_eq!(scale.pixel_to_price(100.0, viewport).expect("quarter"), 75.0);
}

#[test]
fn price_scale_rejects_invalid_viewport() {
    let scale = PriceScale::new(0.0, 1.0).expect("valid scale");
    let err = scale
        .price_to_pixel(0.5, Viewport::new(800, 0))
        .expect_err("zero height");
    assert!(matches!(err, AnnotationError::InvalidViewport { .. }));
}

#[test]
fn price_scale_from_ohlc_applies_padding() {
    let bars = vec![
        OhlcBar::new(0.0, 10.0, 20.0, 5.0, 15.0).expect("bar"),
        OhlcBar::new(1.0, 15.0, 25.0, 10.0, 20.0).expect("bar"),
    ];
    let scale = PriceScale::from_ohlc(&bars, 0.1).expect("scale");
    let (min, max) = scale.domain();

    assert!((min - 3.0).abs() <= 1e-9);
    assert!((max - 27.0).abs() <= 1e-9);
    assert!(PriceScale::from_ohlc(&[], 0.1).is_err());
}

#[test]
fn uninitialized_axes_resolve_nothing() {
    let axes = LinearChartAxes::uninitialized(Viewport::new(640, 480));

    assert_eq!(axes.time_to_x(0.0), None);
    assert_eq!(axes.x_to_time(10.0), None);
    assert_eq!(axes.price_to_y(1.0), None);
    assert_eq!(axes.y_to_price(10.0), None);
    assert_eq!(axes.logical_index_at_x(10.0), None);
}

#[test]
fn clipping_axes_reject_off_screen_values() {
    let axes = LinearChartAxes::new(
        Viewport::new(1000, 500),
        TimeScale::new(0.0, 10_000.0).expect("time scale"),
        PriceScale::new(0.0, 100.0).expect("price scale"),
    )
    .with_visible_clipping(true);

    assert_eq!(axes.time_to_x(5_000.0), Some(500.0));
    assert_eq!(axes.time_to_x(12_000.0), None);
    assert_eq!(axes.x_to_time(-1.0), None);
    assert_eq!(axes.price_to_y(150.0), None);
    assert_eq!(axes.y_to_price(250.0), Some(50.0));
}

#[test]
fn panning_axes_shifts_time_mapping() {
    let mut axes = LinearChartAxes::new(
        Viewport::new(1000, 500),
        TimeScale::new(0.0, 10_000.0).expect("time scale"),
        PriceScale::new(0.0, 100.0).expect("price scale"),
    );

    axes.pan_time_by(1_000.0).expect("pan");
    assert_eq!(axes.time_to_x(1_000.0), Some(0.0));

    axes.set_price_domain(0.0, 50.0).expect("price domain");
    assert_eq!(axes.price_to_y(25.0), Some(250.0));

    let mut uninitialized = LinearChartAxes::uninitialized(Viewport::new(10, 10));
    assert!(uninitialized.pan_time_by(1.0).is_err());
}
