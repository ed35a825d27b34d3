use crate::core::{OhlcBar, PriceScale, TimeScale, Viewport};
use crate::error::{AnnotationError, AnnotationResult};

/// Axis oracle provided by the host chart widget.
///
/// Every conversion returns `None` when the host cannot resolve the value
/// (axis not initialized yet, value outside the resolvable range). Methods
/// must never panic.
pub trait ChartAxes {
    fn viewport(&self) -> Viewport;

    fn time_to_x(&self, time_ms: f64) -> Option<f64>;
    fn x_to_time(&self, x: f64) -> Option<f64>;

    fn price_to_y(&self, price: f64) -> Option<f64>;
    fn y_to_price(&self, y: f64) -> Option<f64>;

    /// Fractional logical bar index under `x`; the integer part is the bar
    /// at or left of the position.
    fn logical_index_at_x(&self, x: f64) -> Option<f64>;

    fn bar_at(&self, index: usize) -> Option<OhlcBar>;

    /// Called when the annotation canvas is resized. Hosts whose widget
    /// already tracks its own size keep the default no-op.
    fn resize_viewport(&mut self, _viewport: Viewport) {}
}

/// Headless axis model built on [`TimeScale`] and [`PriceScale`].
///
/// Used by hosts without a widget of their own and by tests. When
/// `clip_to_visible` is enabled, values outside the visible time range or the
/// canvas resolve to `None`, the way chart widgets report off-screen values.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearChartAxes {
    viewport: Viewport,
    scales: Option<(TimeScale, PriceScale)>,
    bars: Vec<OhlcBar>,
    clip_to_visible: bool,
}

impl LinearChartAxes {
    #[must_use]
    pub fn new(viewport: Viewport, time_scale: TimeScale, price_scale: PriceScale) -> Self {
        Self {
            viewport,
            scales: Some((time_scale, price_scale)),
            bars: Vec::new(),
            clip_to_visible: false,
        }
    }

    /// Axes whose scales are not known yet; every conversion yields `None`.
    #[must_use]
    pub fn uninitialized(viewport: Viewport) -> Self {
        Self {
            viewport,
            scales: None,
            bars: Vec::new(),
            clip_to_visible: false,
        }
    }

    #[must_use]
    pub fn with_visible_clipping(mut self, enabled: bool) -> Self {
        self.clip_to_visible = enabled;
        self
    }

    /// Replaces bar data. Bars are sorted by time; duplicates keep the last one.
    pub fn set_bars(&mut self, mut bars: Vec<OhlcBar>) -> AnnotationResult<()> {
        if bars.iter().any(|bar| !bar.time.is_finite()) {
            return Err(AnnotationError::InvalidData(
                "bar times must be finite".to_owned(),
            ));
        }
        bars.sort_by(|a, b| a.time.total_cmp(&b.time));
        bars.dedup_by(|later, earlier| {
            if later.time == earlier.time {
                *earlier = *later;
                true
            } else {
                false
            }
        });
        self.bars = bars;
        Ok(())
    }

    #[must_use]
    pub fn with_bars(mut self, bars: Vec<OhlcBar>) -> AnnotationResult<Self> {
        self.set_bars(bars)?;
        Ok(self)
    }

    #[must_use]
    pub fn bars(&self) -> &[OhlcBar] {
        &self.bars
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_scales(&mut self, time_scale: TimeScale, price_scale: PriceScale) {
        self.scales = Some((time_scale, price_scale));
    }

    #[must_use]
    pub fn time_scale(&self) -> Option<TimeScale> {
        self.scales.map(|(time, _)| time)
    }

    #[must_use]
    pub fn price_scale(&self) -> Option<PriceScale> {
        self.scales.map(|(_, price)| price)
    }

    pub fn set_visible_time_range(&mut self, start_ms: f64, end_ms: f64) -> AnnotationResult<()> {
        let (time, _) = self.scales_mut()?;
        time.set_visible_range(start_ms, end_ms)
    }

    pub fn pan_time_by(&mut self, delta_ms: f64) -> AnnotationResult<()> {
        let (time, _) = self.scales_mut()?;
        time.pan_visible_by_delta(delta_ms)
    }

    pub fn set_price_domain(&mut self, price_min: f64, price_max: f64) -> AnnotationResult<()> {
        let (_, price) = self.scales_mut()?;
        price.set_domain(price_min, price_max)
    }

    fn scales_mut(&mut self) -> AnnotationResult<(&mut TimeScale, &mut PriceScale)> {
        match self.scales.as_mut() {
            Some((time, price)) => Ok((time, price)),
            None => Err(AnnotationError::InvalidData(
                "axes are not initialized".to_owned(),
            )),
        }
    }

    fn x_in_canvas(&self, x: f64) -> bool {
        !self.clip_to_visible || (0.0..=f64::from(self.viewport.width)).contains(&x)
    }

    fn y_in_canvas(&self, y: f64) -> bool {
        !self.clip_to_visible || (0.0..=f64::from(self.viewport.height)).contains(&y)
    }
}

impl ChartAxes for LinearChartAxes {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn time_to_x(&self, time_ms: f64) -> Option<f64> {
        let (time, _) = self.scales?;
        if self.clip_to_visible && !time.contains(time_ms) {
            return None;
        }
        time.time_to_pixel(time_ms, self.viewport).ok()
    }

    fn x_to_time(&self, x: f64) -> Option<f64> {
        let (time, _) = self.scales?;
        if !self.x_in_canvas(x) {
            return None;
        }
        time.pixel_to_time(x, self.viewport).ok()
    }

    fn price_to_y(&self, price: f64) -> Option<f64> {
        let (_, scale) = self.scales?;
        let y = scale.price_to_pixel(price, self.viewport).ok()?;
        self.y_in_canvas(y).then_some(y)
    }

    fn y_to_price(&self, y: f64) -> Option<f64> {
        let (_, scale) = self.scales?;
        if !self.y_in_canvas(y) {
            return None;
        }
        scale.pixel_to_price(y, self.viewport).ok()
    }

    fn logical_index_at_x(&self, x: f64) -> Option<f64> {
        let time = self.x_to_time(x)?;
        let right = self.bars.partition_point(|bar| bar.time <= time);
        let index = right.checked_sub(1)?;
        let fraction = match self.bars.get(right) {
            Some(next) => {
                let current = self.bars[index].time;
                (time - current) / (next.time - current)
            }
            None => 0.0,
        };
        Some(index as f64 + fraction)
    }

    fn bar_at(&self, index: usize) -> Option<OhlcBar> {
        self.bars.get(index).copied()
    }

    fn resize_viewport(&mut self, viewport: Viewport) {
        self.set_viewport(viewport);
    }
}
