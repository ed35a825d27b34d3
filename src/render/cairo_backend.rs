use cairo::{Context, Format, ImageSurface};
use std::f64::consts::TAU;

use crate::core::Viewport;
use crate::error::{AnnotationError, AnnotationResult};
use crate::render::{Color, LineStrokeStyle, RenderFrame, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> AnnotationResult<()>;
}

/// Cairo renderer backend for the annotation layer.
///
/// The annotation canvas is transparent: every pass clears to fully
/// transparent before painting so the chart underneath stays visible.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(viewport: Viewport, pixel_ratio: f64) -> AnnotationResult<Self> {
        Ok(Self {
            surface: allocate_surface(viewport, pixel_ratio)?,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> AnnotationResult<()> {
        frame.validate()?;

        context.save().map_err(|err| map_backend_error("failed to save state", err))?;
        context.identity_matrix();
        context.set_operator(cairo::Operator::Clear);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;
        context.set_operator(cairo::Operator::Over);
        context.scale(frame.pixel_ratio, frame.pixel_ratio);

        let mut stats = CairoRenderStats::default();

        for rect in &frame.rects {
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            apply_color(context, rect.fill_color);
            if rect.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                apply_color(context, rect.border_color);
                context.set_line_width(rect.border_width);
                apply_stroke_style(context, rect.border_style);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            apply_stroke_style(context, line.stroke_style);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        context.set_dash(&[], 0.0);
        for circle in &frame.circles {
            context.new_sub_path();
            context.arc(circle.x, circle.y, circle.radius, 0.0, TAU);
            apply_color(context, circle.fill_color);
            if circle.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill handle", err))?;
                apply_color(context, circle.border_color);
                context.set_line_width(circle.border_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke handle", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill handle", err))?;
            }
            stats.circles_drawn += 1;
        }

        context
            .restore()
            .map_err(|err| map_backend_error("failed to restore state", err))?;
        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn resize(&mut self, viewport: Viewport, pixel_ratio: f64) -> AnnotationResult<()> {
        self.surface = allocate_surface(viewport, pixel_ratio)?;
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> AnnotationResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> AnnotationResult<()> {
        self.render_with_context(context, frame)
    }
}

fn allocate_surface(viewport: Viewport, pixel_ratio: f64) -> AnnotationResult<ImageSurface> {
    if !viewport.is_valid() || !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
        return Err(AnnotationError::RenderContextUnavailable(format!(
            "cannot allocate a {}x{}@{pixel_ratio} cairo surface",
            viewport.width, viewport.height
        )));
    }
    let width = (f64::from(viewport.width) * pixel_ratio).ceil() as i32;
    let height = (f64::from(viewport.height) * pixel_ratio).ceil() as i32;
    ImageSurface::create(Format::ARgb32, width, height).map_err(|err| {
        AnnotationError::RenderContextUnavailable(format!("failed to create cairo surface: {err}"))
    })
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_stroke_style(context: &Context, style: LineStrokeStyle) {
    match style {
        LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
        LineStrokeStyle::Dashed { dash_px, gap_px } => context.set_dash(&[dash_px, gap_px], 0.0),
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> AnnotationError {
    AnnotationError::InvalidData(format!("{prefix}: {err}"))
}
