//! Continuous color scale over the values of one variable.

mod color;

use serde::Serialize;

use crate::{error::CensusError, join::EnrichedBoundaryCollection, render::format::grouped};

pub use color::{Rgb, NO_DATA, PALETTE};

/// Piecewise-linear ramp across `anchors`, stretched over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    anchors: Vec<Rgb>,
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Domain of the valid values of `variable_id` across every region.
    pub fn derive(enriched: &EnrichedBoundaryCollection, variable_id: &str) -> Result<Self, CensusError> {
        Self::from_values(enriched.values(variable_id).flatten(), &PALETTE)
            .ok_or_else(|| CensusError::NoDataForVariable(variable_id.to_string()))
    }

    /// Scale over the finite values in `values`; `None` when there are none or
    /// `anchors` is empty.
    pub fn from_values(values: impl IntoIterator<Item = f64>, anchors: &[Rgb]) -> Option<Self> {
        if anchors.is_empty() { return None }

        let (min, max) = values.into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;

        Some(Self { anchors: anchors.to_vec(), min, max })
    }

    pub fn domain(&self) -> (f64, f64) { (self.min, self.max) }

    pub fn color_for(&self, value: f64) -> Rgb {
        // NaN / infinities: fall back to neutral gray.
        if !value.is_finite() { return NO_DATA }

        let span = self.max - self.min;
        let t = if span > 0.0 { ((value - self.min) / span).clamp(0.0, 1.0) } else { 0.0 };
        if !t.is_finite() { return NO_DATA }

        match self.anchors.as_slice() {
            [] => NO_DATA,
            [only] => *only,
            anchors => {
                let segments = anchors.len() - 1;
                let pos = t * segments as f64;
                let idx = (pos.floor() as usize).min(segments - 1);
                anchors[idx].lerp(anchors[idx + 1], pos - idx as f64)
            }
        }
    }

    /// Fill for a region value; `None` is rendered as "no data".
    pub fn color_for_optional(&self, value: Option<f64>) -> Rgb {
        value.map_or(NO_DATA, |v| self.color_for(v))
    }

    pub fn legend(&self, label: impl Into<String>) -> Legend {
        Legend {
            label: label.into(),
            min: self.min,
            max: self.max,
            min_color: self.color_for(self.min),
            max_color: self.color_for(self.max),
        }
    }
}

/// Gradient endpoints and numeric labels for the map legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub min_color: Rgb,
    pub max_color: Rgb,
}

impl Legend {
    pub fn gradient_css(&self) -> String {
        format!("linear-gradient(to right, {}, {})", self.min_color, self.max_color)
    }

    pub fn min_label(&self) -> String { grouped(self.min) }

    pub fn max_label(&self) -> String { grouped(self.max) }
}
