use serde::{Deserialize, Serialize};

use crate::core::time_scale::normalize_range;
use crate::core::{LinearScale, OhlcBar, Viewport};
use crate::error::{AnnotationError, AnnotationResult};

/// Price axis model mapped to an inverted Y pixel axis.
///
/// `price_max` sits at `y = 0`, `price_min` at `y = viewport.height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    price_min: f64,
    price_max: f64,
}

impl PriceScale {
    pub fn new(price_min: f64, price_max: f64) -> AnnotationResult<Self> {
        let (price_min, price_max) = normalize_range(price_min, price_max, 0.000_001)?;
        Ok(Self {
            price_min,
            price_max,
        })
    }

    /// Fits the domain to the low/high envelope of `bars` plus a relative margin.
    pub fn from_ohlc(bars: &[OhlcBar], padding_ratio: f64) -> AnnotationResult<Self> {
        if !padding_ratio.is_finite() || padding_ratio < 0.0 {
            return Err(AnnotationError::InvalidData(
                "price padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if bars.is_empty() {
            return Err(AnnotationError::InvalidData(
                "price scale cannot be built from empty data".to_owned(),
            ));
        }

        let (min, max) = bars
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), bar| {
                (min.min(bar.low), max.max(bar.high))
            });
        let (min, max) = normalize_range(min, max, 0.000_001)?;
        let padding = (max - min) * padding_ratio;
        Self::new(min - padding, max + padding)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.price_min, self.price_max)
    }

    pub fn set_domain(&mut self, price_min: f64, price_max: f64) -> AnnotationResult<()> {
        *self = Self::new(price_min, price_max)?;
        Ok(())
    }

    pub fn price_to_pixel(self, price: f64, viewport: Viewport) -> AnnotationResult<f64> {
        let height = validated_height(viewport)?;
        let normalized = self.linear()?.domain_to_pixel(price, height)?;
        Ok(height - normalized)
    }

    pub fn pixel_to_price(self, pixel: f64, viewport: Viewport) -> AnnotationResult<f64> {
        let height = validated_height(viewport)?;
        if !pixel.is_finite() {
            return Err(AnnotationError::InvalidData(
                "pixel must be finite".to_owned(),
            ));
        }
        self.linear()?.pixel_to_domain(height - pixel, height)
    }

    fn linear(self) -> AnnotationResult<LinearScale> {
        LinearScale::new(self.price_min, self.price_max)
    }
}

fn validated_height(viewport: Viewport) -> AnnotationResult<f64> {
    if !viewport.is_valid() {
        return Err(AnnotationError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(f64::from(viewport.height))
}
