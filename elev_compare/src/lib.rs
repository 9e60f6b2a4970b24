//! Elevation profile comparison across FIT activity files.
//!
//! Each file is decoded into a record stream, filtered down to
//! (distance, altitude) samples, converted into display units and shifted so
//! its first sample reads zero. The surviving series share one set of axis
//! bounds and are handed to a plotting backend as a [`ChartSpec`].

use thiserror::Error;

pub mod batch;
pub mod bounds;
pub mod chart;
pub mod extract;
pub mod fit;
pub mod record;
pub mod series;
pub mod units;

pub use batch::{compare_files, BatchReport, Comparison, FileOutcome, FileReport, SkipReason};
pub use bounds::AxisBounds;
pub use chart::{build_chart_spec, ChartSeries, ChartSpec, Rgb, PALETTE};
pub use extract::{extract_samples, Extraction, RawSample};
pub use fit::{FitDecoder, FitRecordStream};
pub use record::{DecodeError, FieldValue, Record, RecordDecoder};
pub use series::{normalize_baseline, Series};
pub use units::UnitSystem;

/// Smallest number of files that makes a comparison.
pub const MIN_INPUT_FILES: usize = 2;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("please provide at least two FIT files (got {0})")]
    Usage(usize),
    #[error("no file produced elevation data; nothing to compare")]
    AllFilesEmpty,
    #[error("failed to decode {path}: {message}")]
    Decoder { path: String, message: String },
    #[error("cannot normalize an empty elevation series")]
    EmptySeries,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompareConfig {
    pub units: UnitSystem,
    /// Added above and below the normalized elevation extrema, in display
    /// length units.
    pub margin: f64,
    pub distance_field: String,
    pub altitude_field: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            units: UnitSystem::Imperial,
            margin: 10.0,
            distance_field: "distance".to_string(),
            altitude_field: "altitude".to_string(),
        }
    }
}

impl CompareConfig {
    pub fn validate(&self) -> Result<(), CompareError> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(CompareError::InvalidParameter(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        if self.distance_field.trim().is_empty() || self.altitude_field.trim().is_empty() {
            return Err(CompareError::InvalidParameter(
                "field names must not be empty".into(),
            ));
        }
        Ok(())
    }
}
