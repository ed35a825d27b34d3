use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::annotation::AnchorPoint;
use crate::core::{ChartAxes, OhlcBar, ScreenPoint};
use crate::error::{AnnotationError, AnnotationResult};

/// Which bar values are snap targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapMode {
    /// Open, high, low and close.
    #[default]
    Ohlc,
    HighLow,
    Close,
}

impl SnapMode {
    fn candidates(self, bar: OhlcBar) -> SmallVec<[f64; 4]> {
        match self {
            Self::Ohlc => SmallVec::from_buf([bar.open, bar.high, bar.low, bar.close]),
            Self::HighLow => SmallVec::from_slice(&[bar.high, bar.low]),
            Self::Close => SmallVec::from_slice(&[bar.close]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    pub enabled: bool,
    pub mode: SnapMode,
    pub radius_px: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: SnapMode::Ohlc,
            radius_px: 10.0,
        }
    }
}

impl SnapConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(self) -> AnnotationResult<Self> {
        if !self.radius_px.is_finite() || self.radius_px < 0.0 {
            return Err(AnnotationError::InvalidData(
                "snap radius must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Domain <-> screen conversion on top of the host axis oracle.
///
/// Every method returns `None` when the host cannot resolve the value; the
/// mapper never fails loudly.
pub struct CoordinateMapper<'a, A: ChartAxes + ?Sized> {
    axes: &'a A,
    snap: SnapConfig,
}

impl<A: ChartAxes + ?Sized> Clone for CoordinateMapper<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ChartAxes + ?Sized> Copy for CoordinateMapper<'_, A> {}

impl<'a, A: ChartAxes + ?Sized> CoordinateMapper<'a, A> {
    #[must_use]
    pub fn new(axes: &'a A, snap: SnapConfig) -> Self {
        Self { axes, snap }
    }

    #[must_use]
    pub fn axes(&self) -> &'a A {
        self.axes
    }

    #[must_use]
    pub fn snap_config(&self) -> SnapConfig {
        self.snap
    }

    #[must_use]
    pub fn to_screen_x(&self, time_ms: f64) -> Option<f64> {
        finite(self.axes.time_to_x(time_ms))
    }

    #[must_use]
    pub fn to_screen_y(&self, price: f64) -> Option<f64> {
        finite(self.axes.price_to_y(price))
    }

    #[must_use]
    pub fn from_screen_x(&self, x: f64) -> Option<f64> {
        finite(self.axes.x_to_time(x))
    }

    #[must_use]
    pub fn from_screen_y(&self, y: f64) -> Option<f64> {
        finite(self.axes.y_to_price(y))
    }

    #[must_use]
    pub fn to_screen(&self, point: AnchorPoint) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            self.to_screen_x(point.time_ms)?,
            self.to_screen_y(point.price)?,
        ))
    }

    /// Maps a pixel position to a domain anchor, snapping the price when
    /// `snap` is requested and snapping is enabled.
    #[must_use]
    pub fn from_screen(&self, position: ScreenPoint, snap: bool) -> Option<AnchorPoint> {
        let time_ms = self.from_screen_x(position.x)?;
        let raw_price = self.from_screen_y(position.y)?;
        let price = if snap {
            self.snap_price(position, raw_price)
        } else {
            raw_price
        };
        Some(AnchorPoint::new(time_ms, price))
    }

    /// Snaps `raw_price` to the closest O/H/L/C value of the bar at or left of
    /// `position.x`, if that value lies within the snap radius in pixels.
    #[must_use]
    pub fn snap_price(&self, position: ScreenPoint, raw_price: f64) -> f64 {
        if !self.snap.enabled {
            return raw_price;
        }
        let Some(index) = self.axes.logical_index_at_x(position.x) else {
            return raw_price;
        };
        if !index.is_finite() || index < 0.0 {
            return raw_price;
        }
        let Some(bar) = self.axes.bar_at(index.floor() as usize) else {
            return raw_price;
        };

        self.snap
            .mode
            .candidates(bar)
            .into_iter()
            .filter_map(|candidate| {
                let y = self.to_screen_y(candidate)?;
                Some((OrderedFloat((y - position.y).abs()), candidate))
            })
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| distance.0 <= self.snap.radius_px)
            .map_or(raw_price, |(_, candidate)| candidate)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
