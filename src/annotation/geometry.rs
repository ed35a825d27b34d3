//! Screen-space distance functions used by hit testing.
//!
//! All inputs are pixel coordinates. Distances are Euclidean unless noted.

use serde::{Deserialize, Serialize};

use crate::core::ScreenPoint;

/// Maximum pixel distance at which a pointer still "touches" a shape.
pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 6.0;
/// Radius of a control handle drawn on the selected annotation.
pub const DEFAULT_HANDLE_RADIUS_PX: f64 = 4.0;
/// Radius of a control handle under the pointer.
pub const DEFAULT_HANDLE_HOVER_RADIUS_PX: f64 = 6.0;

const DEGENERATE_SEGMENT_EPSILON: f64 = 1e-12;

#[must_use]
pub fn distance_to_point(p: ScreenPoint, q: ScreenPoint) -> f64 {
    p.distance_to(q)
}

/// Distance to an infinite horizontal line at `line_y`.
#[must_use]
pub fn distance_to_horizontal_line(p: ScreenPoint, line_y: f64) -> f64 {
    (p.y - line_y).abs()
}

/// Distance to the closed segment `a`..`b`.
#[must_use]
pub fn distance_to_segment(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq < DEGENERATE_SEGMENT_EPSILON {
        return p.distance_to(a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance_to(ScreenPoint::new(a.x + t * dx, a.y + t * dy))
}

/// Outline-only rectangle test: `0.0` when `p` lies within `tolerance` of any
/// edge of the rectangle spanned by `a` and `b`, `f64::INFINITY` otherwise.
/// The interior is not a hit.
#[must_use]
pub fn distance_to_rect_edge(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint, tolerance: f64) -> f64 {
    let top_left = ScreenPoint::new(a.x.min(b.x), a.y.min(b.y));
    let top_right = ScreenPoint::new(a.x.max(b.x), a.y.min(b.y));
    let bottom_right = ScreenPoint::new(a.x.max(b.x), a.y.max(b.y));
    let bottom_left = ScreenPoint::new(a.x.min(b.x), a.y.max(b.y));

    let nearest = [
        (top_left, top_right),
        (top_right, bottom_right),
        (bottom_right, bottom_left),
        (bottom_left, top_left),
    ]
    .into_iter()
    .map(|(start, end)| distance_to_segment(p, start, end))
    .fold(f64::INFINITY, f64::min);

    if nearest <= tolerance {
        0.0
    } else {
        f64::INFINITY
    }
}

/// Axis-aligned bounding box in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    #[must_use]
    pub fn from_points(points: &[ScreenPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for point in rest {
            aabb.min_x = aabb.min_x.min(point.x);
            aabb.min_y = aabb.min_y.min(point.y);
            aabb.max_x = aabb.max_x.max(point.x);
            aabb.max_y = aabb.max_y.max(point.y);
        }
        Some(aabb)
    }

    #[must_use]
    pub fn expanded(self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    #[must_use]
    pub fn contains(self, p: ScreenPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{Aabb, distance_to_horizontal_line, distance_to_rect_edge, distance_to_segment};
    use crate::core::ScreenPoint;

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(10.0, 0.0);
        assert_abs_diff_eq!(distance_to_segment(ScreenPoint::new(5.0, 3.0), a, b), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(distance_to_segment(ScreenPoint::new(13.0, 4.0), a, b), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(distance_to_segment(ScreenPoint::new(-3.0, 0.0), a, b), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_segment_is_point_distance() {
        let a = ScreenPoint::new(2.0, 2.0);
        assert_abs_diff_eq!(distance_to_segment(ScreenPoint::new(5.0, 6.0), a, a), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn horizontal_line_ignores_x() {
        assert_abs_diff_eq!(
            distance_to_horizontal_line(ScreenPoint::new(-1_000.0, 12.0), 10.0),
            2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn rect_interior_is_not_a_hit() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(100.0, 50.0);
        assert_eq!(distance_to_rect_edge(ScreenPoint::new(50.0, 25.0), a, b, 5.0), f64::INFINITY);
        assert_eq!(distance_to_rect_edge(ScreenPoint::new(50.0, 3.0), a, b, 5.0), 0.0);
        assert_eq!(distance_to_rect_edge(ScreenPoint::new(104.0, 25.0), a, b, 5.0), 0.0);
        assert_eq!(distance_to_rect_edge(ScreenPoint::new(106.0, 25.0), a, b, 5.0), f64::INFINITY);
    }

    #[test]
    fn aabb_expansion_contains_near_points() {
        let aabb = Aabb::from_points(&[ScreenPoint::new(10.0, 10.0), ScreenPoint::new(20.0, 5.0)])
            .expect("aabb");
        assert!(!aabb.contains(ScreenPoint::new(22.0, 7.0)));
        assert!(aabb.expanded(3.0).contains(ScreenPoint::new(22.0, 7.0)));
        assert!(Aabb::from_points(&[]).is_none());
    }
}
