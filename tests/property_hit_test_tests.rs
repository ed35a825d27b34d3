use chart_annotations::annotation::geometry::distance_to_segment;
use chart_annotations::annotation::{
    AnchorPoint, Annotation, AnnotationId, AnnotationStore, CoordinateMapper, ScreenCache,
    SnapConfig, hit_test,
};
use chart_annotations::core::{LinearChartAxes, PriceScale, ScreenPoint, TimeScale, Viewport};
use proptest::prelude::*;

const TOLERANCE: f64 = 6.0;

fn axes() -> LinearChartAxes {
    LinearChartAxes::new(
        Viewport::new(1200, 700),
        TimeScale::new(0.0, 120_000.0).expect("time scale"),
        PriceScale::new(0.0, 700.0).expect("price scale"),
    )
}

fn store(lines: &[(f64, f64, f64, f64)]) -> AnnotationStore {
    let annotations = lines
        .iter()
        .enumerate()
        .map(|(index, &(t0, p0, t1, p1))| {
            Annotation::trend_line(
                AnnotationId::new(format!("t{index}")),
                AnchorPoint::new(t0, p0),
                AnchorPoint::new(t1, p1),
            )
            .expect("trend")
        })
        .collect();
    AnnotationStore::from_annotations(annotations)
}

fn segment() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (
        0.0f64..120_000.0,
        0.0f64..700.0,
        0.0f64..120_000.0,
        0.0f64..700.0,
    )
}

proptest! {
    #[test]
    fn aabb_prefilter_never_changes_the_result(
        lines in prop::collection::vec(segment(), 1..12),
        x in 0.0f64..1200.0,
        y in 0.0f64..700.0
    ) {
        let axes = axes();
        let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
        let store = store(&lines);
        let mut cache = ScreenCache::new();
        cache.rebuild(&store, &mapper);
        let cursor = ScreenPoint::new(x, y);

        let hit = hit_test(cursor, &store, None, &mapper, &cache, TOLERANCE);

        // brute force without the cache
        let mut best: Option<(f64, usize)> = None;
        for (index, annotation) in store.iter().enumerate().rev() {
            let a = mapper.to_screen(annotation.points()[0]).expect("map a");
            let b = mapper.to_screen(annotation.points()[1]).expect("map b");
            let distance = distance_to_segment(cursor, a, b);
            if distance <= TOLERANCE && best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, index));
            }
        }
        let expected = best.map(|(_, index)| AnnotationId::new(format!("t{index}")));

        prop_assert_eq!(hit.map(|target| target.id), expected);
    }

    #[test]
    fn hits_are_within_tolerance_of_the_segment(
        line in segment(),
        along in 0.0f64..=1.0,
        offset in -5.9f64..5.9
    ) {
        let axes = axes();
        let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
        let store = store(&[line]);
        let mut cache = ScreenCache::new();
        cache.rebuild(&store, &mapper);

        let annotation = store.iter().next().expect("trend");
        let a = mapper.to_screen(annotation.points()[0]).expect("map a");
        let b = mapper.to_screen(annotation.points()[1]).expect("map b");
        let length = a.distance_to(b);
        prop_assume!(length > 1.0);

        // step off the segment along its normal
        let nx = -(b.y - a.y) / length;
        let ny = (b.x - a.x) / length;
        let cursor = ScreenPoint::new(
            a.x + (b.x - a.x) * along + nx * offset,
            a.y + (b.y - a.y) * along + ny * offset,
        );

        let hit = hit_test(cursor, &store, None, &mapper, &cache, TOLERANCE);
        prop_assert!(hit.is_some());
    }

    #[test]
    fn hit_testing_is_pure(
        lines in prop::collection::vec(segment(), 1..8),
        selected in 0usize..8,
        x in 0.0f64..1200.0,
        y in 0.0f64..700.0
    ) {
        let axes = axes();
        let mapper = CoordinateMapper::new(&axes, SnapConfig::disabled());
        let store = store(&lines);
        let mut cache = ScreenCache::new();
        cache.rebuild(&store, &mapper);
        let selected = AnnotationId::new(format!("t{}", selected % lines.len()));
        let cursor = ScreenPoint::new(x, y);
        let before = store.to_vec();

        let first = hit_test(cursor, &store, Some(&selected), &mapper, &cache, TOLERANCE);
        let second = hit_test(cursor, &store, Some(&selected), &mapper, &cache, TOLERANCE);

        prop_assert_eq!(first, second);
        prop_assert_eq!(store.to_vec(), before);
        prop_assert!(cache.is_valid());
    }
}

