//! Sequential per-file processing for one comparison run.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bounds::AxisBounds;
use crate::chart::{build_chart_spec, ChartSpec};
use crate::extract::extract_samples;
use crate::record::{DecodeError, RecordDecoder};
use crate::series::Series;
use crate::units::UnitSystem;
use crate::{CompareConfig, CompareError, MIN_INPUT_FILES};

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoElevationData,
    TruncatedBeforeData,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoElevationData => write!(f, "no elevation data found"),
            SkipReason::TruncatedBeforeData => {
                write!(f, "file truncated before any elevation data")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FileOutcome {
    Plotted { path: String, truncated: bool },
    Skipped { path: String, reason: SkipReason },
}

impl FileOutcome {
    pub fn path(&self) -> &str {
        match self {
            FileOutcome::Plotted { path, .. } | FileOutcome::Skipped { path, .. } => path,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FileOutcome::Skipped { .. })
    }

    pub fn is_truncated(&self) -> bool {
        match self {
            FileOutcome::Plotted { truncated, .. } => *truncated,
            FileOutcome::Skipped { reason, .. } => *reason == SkipReason::TruncatedBeforeData,
        }
    }
}

/// Everything a run produced: one outcome per input in input order, the
/// surviving series, and their shared frame.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub outcomes: Vec<FileOutcome>,
    pub series: Vec<Series>,
    pub bounds: AxisBounds,
    pub units: UnitSystem,
    pub margin: f64,
}

impl Comparison {
    pub fn chart_spec(&self) -> ChartSpec {
        build_chart_spec(&self.series, &self.bounds, self.units)
    }

    pub fn report(&self) -> BatchReport {
        let mut plotted = self.series.iter();
        let files = self
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                FileOutcome::Plotted { path, truncated } => {
                    let series = plotted.next();
                    FileReport {
                        path: path.clone(),
                        plotted: true,
                        truncated: *truncated,
                        skip_reason: None,
                        samples: series.map_or(0, Series::len),
                        net_change: series.map(Series::net_change),
                        elevation_range: series.and_then(Series::elevation_range),
                    }
                }
                FileOutcome::Skipped { path, reason } => FileReport {
                    path: path.clone(),
                    plotted: false,
                    truncated: outcome.is_truncated(),
                    skip_reason: Some(*reason),
                    samples: 0,
                    net_change: None,
                    elevation_range: None,
                },
            })
            .collect();

        BatchReport {
            units: self.units,
            distance_unit: self.units.distance_unit(),
            length_unit: self.units.length_unit(),
            margin: self.margin,
            bounds: self.bounds,
            files,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub plotted: bool,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
    pub samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_range: Option<(f64, f64)>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    pub units: UnitSystem,
    pub distance_unit: &'static str,
    pub length_unit: &'static str,
    pub margin: f64,
    pub bounds: AxisBounds,
    pub files: Vec<FileReport>,
}

/// Decode, extract and normalize every input in order, then compute the
/// shared bounds from whatever survived.
///
/// Empty or truncated files are logged and carried as outcomes. Fewer than
/// two inputs, a non-truncation decoder failure, or a batch with no usable
/// file at all end the run with an error.
pub fn compare_files<P, D>(
    paths: &[P],
    decoder: &D,
    config: &CompareConfig,
) -> Result<Comparison, CompareError>
where
    P: AsRef<Path>,
    D: RecordDecoder,
{
    if paths.len() < MIN_INPUT_FILES {
        return Err(CompareError::Usage(paths.len()));
    }
    config.validate()?;

    let mut outcomes = Vec::with_capacity(paths.len());
    let mut series = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let label = path.display().to_string();
        let fatal = |err: DecodeError| CompareError::Decoder {
            path: label.clone(),
            message: err.to_string(),
        };

        let stream = decoder.open(path).map_err(fatal)?;
        let extraction = extract_samples(
            stream,
            &config.distance_field,
            &config.altitude_field,
            &label,
        )
        .map_err(fatal)?;

        if extraction.samples.is_empty() {
            let reason = if extraction.truncated {
                SkipReason::TruncatedBeforeData
            } else {
                SkipReason::NoElevationData
            };
            warn!("Skipping {}: {}", label, reason);
            outcomes.push(FileOutcome::Skipped {
                path: label,
                reason,
            });
            continue;
        }

        let profile = Series::from_samples(label.clone(), &extraction.samples, config.units)?;
        debug!(
            "{}: {} samples, net change {:.1} {}",
            label,
            profile.len(),
            profile.net_change(),
            config.units.length_unit()
        );
        outcomes.push(FileOutcome::Plotted {
            path: label,
            truncated: extraction.truncated,
        });
        series.push(profile);
    }

    let bounds = AxisBounds::from_series(&series, config.margin)?;
    info!(
        "Comparing {} of {} files ({} units)",
        series.len(),
        paths.len(),
        config.units
    );

    Ok(Comparison {
        outcomes,
        series,
        bounds,
        units: config.units,
        margin: config.margin,
    })
}
