use crate::error::{AnnotationError, AnnotationResult};

/// Linear mapping between a domain interval and `[0, extent_px]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> AnnotationResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(AnnotationError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn domain_to_pixel(self, value: f64, extent_px: f64) -> AnnotationResult<f64> {
        validate_extent(extent_px)?;
        if !value.is_finite() {
            return Err(AnnotationError::InvalidData(
                "value must be finite".to_owned(),
            ));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * extent_px)
    }

    pub fn pixel_to_domain(self, pixel: f64, extent_px: f64) -> AnnotationResult<f64> {
        validate_extent(extent_px)?;
        if !pixel.is_finite() {
            return Err(AnnotationError::InvalidData(
                "pixel must be finite".to_owned(),
            ));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = pixel / extent_px;
        Ok(self.domain_start + normalized * span)
    }
}

fn validate_extent(extent_px: f64) -> AnnotationResult<()> {
    if !extent_px.is_finite() || extent_px <= 0.0 {
        return Err(AnnotationError::InvalidData(
            "pixel extent must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}
