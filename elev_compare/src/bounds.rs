use serde::Serialize;

use crate::series::Series;
use crate::CompareError;

/// Shared chart frame for every series in a batch.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisBounds {
    /// Distance extrema over all series, elevation extrema widened by
    /// `margin` once on each side.
    pub fn from_series(series: &[Series], margin: f64) -> Result<Self, CompareError> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut seen = 0usize;

        for s in series {
            let (Some((d_lo, d_hi)), Some((e_lo, e_hi))) =
                (s.distance_range(), s.elevation_range())
            else {
                continue;
            };
            x_min = x_min.min(d_lo);
            x_max = x_max.max(d_hi);
            y_min = y_min.min(e_lo);
            y_max = y_max.max(e_hi);
            seen += 1;
        }

        if seen == 0 {
            return Err(CompareError::AllFilesEmpty);
        }

        Ok(Self {
            x_min,
            x_max,
            y_min: y_min - margin,
            y_max: y_max + margin,
        })
    }

    pub fn contains_elevation(&self, value: f64) -> bool {
        value >= self.y_min && value <= self.y_max
    }

    /// Distance range usable as a plotting coordinate. A zero-width range
    /// (single-sample series) is widened symmetrically by `pad`.
    pub fn x_range(&self, pad: f64) -> (f64, f64) {
        if self.x_max > self.x_min {
            (self.x_min, self.x_max)
        } else {
            (self.x_min - pad, self.x_max + pad)
        }
    }

    pub fn y_range(&self, pad: f64) -> (f64, f64) {
        if self.y_max > self.y_min {
            (self.y_min, self.y_max)
        } else {
            (self.y_min - pad, self.y_max + pad)
        }
    }
}
