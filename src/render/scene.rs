//! Builds the backend-agnostic frame for one annotation repaint.

use serde::{Deserialize, Serialize};

use crate::annotation::{
    Annotation, AnnotationId, AnnotationKind, AnnotationStore, CoordinateMapper, HitTarget,
};
use crate::core::{ChartAxes, ScreenPoint};
use crate::error::{AnnotationError, AnnotationResult};
use crate::render::{CirclePrimitive, Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame};

/// Colors and strokes shared by every annotation on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSceneStyle {
    pub stroke_color: Color,
    pub selected_color: Color,
    pub hovered_color: Color,
    pub draft_color: Color,
    pub handle_fill_color: Color,
    pub stroke_width: f64,
    pub handle_border_width: f64,
    /// Alpha applied to the stroke color for rectangle interiors.
    pub rect_fill_alpha: f64,
    pub draft_dash_px: f64,
    pub draft_gap_px: f64,
}

impl Default for AnnotationSceneStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::rgb(0.16, 0.38, 1.0),
            selected_color: Color::rgb(1.0, 0.6, 0.0),
            hovered_color: Color::rgb(0.35, 0.6, 1.0),
            draft_color: Color::rgb(0.55, 0.55, 0.6),
            handle_fill_color: Color::rgb(1.0, 1.0, 1.0),
            stroke_width: 1.5,
            handle_border_width: 1.5,
            rect_fill_alpha: 0.12,
            draft_dash_px: 6.0,
            draft_gap_px: 4.0,
        }
    }
}

impl AnnotationSceneStyle {
    pub fn validate(self) -> AnnotationResult<Self> {
        for color in [
            self.stroke_color,
            self.selected_color,
            self.hovered_color,
            self.draft_color,
            self.handle_fill_color,
        ] {
            color.validate()?;
        }
        for (name, value) in [
            ("stroke_width", self.stroke_width),
            ("draft_dash_px", self.draft_dash_px),
            ("draft_gap_px", self.draft_gap_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnnotationError::InvalidData(format!(
                    "scene style `{name}` must be finite and > 0"
                )));
            }
        }
        if !self.handle_border_width.is_finite() || self.handle_border_width < 0.0 {
            return Err(AnnotationError::InvalidData(
                "scene style `handle_border_width` must be finite and >= 0".to_owned(),
            ));
        }
        if !self.rect_fill_alpha.is_finite() || !(0.0..=1.0).contains(&self.rect_fill_alpha) {
            return Err(AnnotationError::InvalidData(
                "scene style `rect_fill_alpha` must be in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }

    fn draft_stroke(self) -> LineStrokeStyle {
        LineStrokeStyle::Dashed {
            dash_px: self.draft_dash_px,
            gap_px: self.draft_gap_px,
        }
    }
}

/// Sizing that is not part of the shared style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub style: AnnotationSceneStyle,
    pub handle_radius_px: f64,
    pub handle_hover_radius_px: f64,
    pub pixel_ratio: f64,
}

/// Interaction state painted on top of the stored annotations.
#[derive(Debug, Clone, Copy)]
pub struct SceneState<'a> {
    pub store: &'a AnnotationStore,
    pub selected: Option<&'a AnnotationId>,
    pub hovered: Option<&'a HitTarget>,
    /// Live drag geometry, painted in place of the stored annotation with
    /// the same id.
    pub live: Option<&'a Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationScene {
    pub frame: RenderFrame,
    /// Annotations with at least one primitive dropped for an unmappable
    /// coordinate.
    pub skipped: Vec<AnnotationId>,
}

#[derive(Clone, Copy)]
struct Stroke {
    color: Color,
    width: f64,
    style: LineStrokeStyle,
}

/// Paints stored annotations in draw order, then the draft, then the handles
/// of the selected annotation.
#[must_use]
pub fn build_scene<A: ChartAxes + ?Sized>(
    state: &SceneState<'_>,
    mapper: &CoordinateMapper<'_, A>,
    options: &SceneOptions,
) -> AnnotationScene {
    let canvas_width = f64::from(mapper.axes().viewport().width);
    let mut scene = AnnotationScene {
        frame: RenderFrame::new(mapper.axes().viewport()).with_pixel_ratio(options.pixel_ratio),
        skipped: Vec::new(),
    };
    let style = options.style;

    for stored in state.store.iter() {
        let annotation = state
            .live
            .filter(|live| live.id() == stored.id())
            .unwrap_or(stored);
        let color = if state.selected == Some(annotation.id()) {
            style.selected_color
        } else if state.hovered.is_some_and(|hover| &hover.id == annotation.id()) {
            style.hovered_color
        } else {
            annotation.style.color.unwrap_or(style.stroke_color)
        };
        let stroke = Stroke {
            color,
            width: annotation.style.stroke_width.unwrap_or(style.stroke_width),
            style: LineStrokeStyle::Solid,
        };
        paint_annotation(&mut scene, annotation, stroke, style, mapper, canvas_width);
    }

    if let Some(draft) = state.store.draft() {
        let stroke = Stroke {
            color: style.draft_color,
            width: draft.style.stroke_width.unwrap_or(style.stroke_width),
            style: style.draft_stroke(),
        };
        paint_annotation(&mut scene, draft, stroke, style, mapper, canvas_width);
    }

    if let Some(selected) = state.selected.and_then(|id| state.store.get(id)) {
        let annotation = state
            .live
            .filter(|live| live.id() == selected.id())
            .unwrap_or(selected);
        paint_handles(&mut scene, annotation, state.hovered, options, mapper);
    }

    scene
}

fn paint_annotation<A: ChartAxes + ?Sized>(
    scene: &mut AnnotationScene,
    annotation: &Annotation,
    stroke: Stroke,
    style: AnnotationSceneStyle,
    mapper: &CoordinateMapper<'_, A>,
    canvas_width: f64,
) {
    match annotation.kind() {
        AnnotationKind::HorizontalLine => {
            let Some(y) = mapper.to_screen_y(annotation.points()[0].price) else {
                mark_skipped(scene, annotation.id());
                return;
            };
            let line = LinePrimitive::new(0.0, y, canvas_width, y, stroke.width, stroke.color)
                .with_stroke_style(stroke.style);
            push_line(scene, annotation.id(), line);
        }
        AnnotationKind::TrendLine => {
            let Some((a, b)) = project_pair(annotation, mapper) else {
                mark_skipped(scene, annotation.id());
                return;
            };
            let line = LinePrimitive::new(a.x, a.y, b.x, b.y, stroke.width, stroke.color)
                .with_stroke_style(stroke.style);
            push_line(scene, annotation.id(), line);
        }
        AnnotationKind::Rectangle => {
            let Some((a, b)) = project_pair(annotation, mapper) else {
                mark_skipped(scene, annotation.id());
                return;
            };
            let fill = stroke.color.with_alpha(style.rect_fill_alpha);
            let rect = RectPrimitive::from_corners(a.x, a.y, b.x, b.y, fill).with_border(
                stroke.width,
                stroke.color,
                stroke.style,
            );
            if rect.validate().is_ok() {
                scene.frame.rects.push(rect);
            } else {
                mark_skipped(scene, annotation.id());
            }
        }
    }
}

fn paint_handles<A: ChartAxes + ?Sized>(
    scene: &mut AnnotationScene,
    annotation: &Annotation,
    hovered: Option<&HitTarget>,
    options: &SceneOptions,
    mapper: &CoordinateMapper<'_, A>,
) {
    for (index, point) in annotation.points().iter().enumerate() {
        let Some(center) = mapper.to_screen(*point) else {
            mark_skipped(scene, annotation.id());
            continue;
        };
        let is_hovered =
            hovered.is_some_and(|hover| &hover.id == annotation.id() && hover.handle == Some(index));
        let radius = if is_hovered {
            options.handle_hover_radius_px
        } else {
            options.handle_radius_px
        };
        let circle = CirclePrimitive::new(center.x, center.y, radius, options.style.handle_fill_color)
            .with_border(options.style.handle_border_width, options.style.selected_color);
        if circle.validate().is_ok() {
            scene.frame.circles.push(circle);
        } else {
            mark_skipped(scene, annotation.id());
        }
    }
}

fn project_pair<A: ChartAxes + ?Sized>(
    annotation: &Annotation,
    mapper: &CoordinateMapper<'_, A>,
) -> Option<(ScreenPoint, ScreenPoint)> {
    match annotation.points() {
        [a, b] => Some((mapper.to_screen(*a)?, mapper.to_screen(*b)?)),
        _ => None,
    }
}

// Finite endpoints can still yield a primitive the backend rejects, e.g. a
// width that overflows; such a primitive is dropped on its own.
fn push_line(scene: &mut AnnotationScene, id: &AnnotationId, line: LinePrimitive) {
    if line.validate().is_ok() {
        scene.frame.lines.push(line);
    } else {
        mark_skipped(scene, id);
    }
}

fn mark_skipped(scene: &mut AnnotationScene, id: &AnnotationId) {
    if !scene.skipped.contains(id) {
        scene.skipped.push(id.clone());
    }
}
