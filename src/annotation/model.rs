use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64};
use crate::error::{AnnotationError, AnnotationResult};
use crate::render::Color;

/// Opaque, client-generated annotation identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh UUID v4 identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationKind {
    HorizontalLine,
    TrendLine,
    Rectangle,
}

impl AnnotationKind {
    /// Number of anchor points every annotation of this kind carries.
    #[must_use]
    pub const fn point_count(self) -> usize {
        match self {
            Self::HorizontalLine => 1,
            Self::TrendLine | Self::Rectangle => 2,
        }
    }
}

/// Domain-space anchor: millisecond timestamp and price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    #[serde(rename = "time")]
    pub time_ms: f64,
    pub price: f64,
}

impl AnchorPoint {
    #[must_use]
    pub const fn new(time_ms: f64, price: f64) -> Self {
        Self { time_ms, price }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, price: Decimal) -> AnnotationResult<Self> {
        Ok(Self {
            time_ms: datetime_to_unix_millis(time),
            price: decimal_to_f64(price, "price")?,
        })
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.time_ms.is_finite() && self.price.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Locked annotations can be selected but never dragged or erased.
    #[serde(default)]
    pub locked: bool,
}

impl AnnotationStyle {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = Some(stroke_width);
        self
    }

    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn validate(self) -> AnnotationResult<()> {
        if let Some(color) = self.color {
            color.validate()?;
        }
        if let Some(width) = self.stroke_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(AnnotationError::InvalidData(
                    "stroke width must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

pub type AnchorPoints = SmallVec<[AnchorPoint; 2]>;

/// A user-placed marker on the price/time canvas.
///
/// `kind` and the number of points are fixed at construction; only point
/// values and style can change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnnotationRecord")]
pub struct Annotation {
    id: AnnotationId,
    kind: AnnotationKind,
    points: AnchorPoints,
    #[serde(default)]
    pub style: AnnotationStyle,
}

impl Annotation {
    pub fn new(
        id: AnnotationId,
        kind: AnnotationKind,
        points: impl IntoIterator<Item = AnchorPoint>,
    ) -> AnnotationResult<Self> {
        let points: AnchorPoints = points.into_iter().collect();
        if points.len() != kind.point_count() {
            return Err(AnnotationError::InvalidAnnotation {
                id: id.to_string(),
                reason: format!(
                    "{kind:?} requires {} point(s), got {}",
                    kind.point_count(),
                    points.len()
                ),
            });
        }
        if points.iter().any(|point| !point.is_finite()) {
            return Err(AnnotationError::InvalidAnnotation {
                id: id.to_string(),
                reason: "anchor points must be finite".to_owned(),
            });
        }
        Ok(Self {
            id,
            kind,
            points,
            style: AnnotationStyle::default(),
        })
    }

    pub fn horizontal_line(id: AnnotationId, point: AnchorPoint) -> AnnotationResult<Self> {
        Self::new(id, AnnotationKind::HorizontalLine, [point])
    }

    pub fn trend_line(
        id: AnnotationId,
        start: AnchorPoint,
        end: AnchorPoint,
    ) -> AnnotationResult<Self> {
        Self::new(id, AnnotationKind::TrendLine, [start, end])
    }

    pub fn rectangle(
        id: AnnotationId,
        corner_a: AnchorPoint,
        corner_b: AnchorPoint,
    ) -> AnnotationResult<Self> {
        Self::new(id, AnnotationKind::Rectangle, [corner_a, corner_b])
    }

    #[must_use]
    pub fn with_style(mut self, style: AnnotationStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    #[must_use]
    pub fn points(&self) -> &[AnchorPoint] {
        &self.points
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.style.locked
    }

    /// Replaces one anchor in place; out-of-range indices are ignored.
    pub(crate) fn set_point(&mut self, index: usize, point: AnchorPoint) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = point;
        }
    }

    /// Replaces all anchors in place, keeping the point count.
    pub(crate) fn set_points(&mut self, points: &[AnchorPoint]) {
        for (slot, point) in self.points.iter_mut().zip(points) {
            *slot = *point;
        }
    }

    #[must_use]
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.points == other.points
    }

    /// `true` when a two-point annotation collapsed onto a single point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self.points.as_slice() {
            [a, b] => a == b,
            _ => false,
        }
    }

    pub fn validate(&self) -> AnnotationResult<()> {
        self.style
            .validate()
            .map_err(|err| AnnotationError::InvalidAnnotation {
                id: self.id.to_string(),
                reason: err.to_string(),
            })
    }
}

#[derive(Deserialize)]
struct AnnotationRecord {
    id: AnnotationId,
    kind: AnnotationKind,
    points: Vec<AnchorPoint>,
    #[serde(default)]
    style: AnnotationStyle,
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = AnnotationError;

    fn try_from(record: AnnotationRecord) -> Result<Self, Self::Error> {
        let annotation =
            Annotation::new(record.id, record.kind, record.points)?.with_style(record.style);
        annotation.validate()?;
        Ok(annotation)
    }
}
