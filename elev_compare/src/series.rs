use crate::extract::RawSample;
use crate::units::UnitSystem;
use crate::CompareError;

/// Per-file profile in display units, anchored at zero elevation.
///
/// Points keep the decoder's emission order; distances are assumed to be
/// non-decreasing and are not sorted.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub distances: Vec<f64>,
    pub elevations: Vec<f64>,
}

impl Series {
    pub fn from_samples(
        label: impl Into<String>,
        samples: &[RawSample],
        units: UnitSystem,
    ) -> Result<Self, CompareError> {
        let distances: Vec<f64> = samples
            .iter()
            .map(|s| units.convert_distance(s.distance_m))
            .collect();
        let altitudes: Vec<f64> = samples
            .iter()
            .map(|s| units.convert_length(s.altitude_m))
            .collect();
        let elevations = normalize_baseline(&altitudes)?;
        Ok(Self {
            label: label.into(),
            distances,
            elevations,
        })
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.distances
            .iter()
            .copied()
            .zip(self.elevations.iter().copied())
    }

    /// (min, max) distance, or `None` for an empty series.
    pub fn distance_range(&self) -> Option<(f64, f64)> {
        min_max(&self.distances)
    }

    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        min_max(&self.elevations)
    }

    /// Net elevation change between the first and last sample.
    pub fn net_change(&self) -> f64 {
        self.elevations.last().copied().unwrap_or(0.0)
    }
}

/// Shift `altitudes` so the first value reads zero.
pub fn normalize_baseline(altitudes: &[f64]) -> Result<Vec<f64>, CompareError> {
    let offset = *altitudes.first().ok_or(CompareError::EmptySeries)?;
    Ok(altitudes.iter().map(|v| v - offset).collect())
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(altitudes: &[f64]) -> Vec<RawSample> {
        altitudes
            .iter()
            .enumerate()
            .map(|(i, &altitude_m)| RawSample {
                distance_m: i as f64 * 1609.344,
                altitude_m,
            })
            .collect()
    }

    #[test]
    fn first_elevation_is_zero() {
        let series =
            Series::from_samples("a.fit", &samples(&[312.4, 318.0, 290.1]), UnitSystem::Imperial)
                .unwrap();
        assert_eq!(series.elevations[0], 0.0);
        assert_eq!(series.distances, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn elevation_matches_converted_difference() {
        let raw = [100.0, 105.0, 102.0, 97.5];
        let series = Series::from_samples("a.fit", &samples(&raw), UnitSystem::Imperial).unwrap();
        for (i, value) in series.elevations.iter().enumerate() {
            assert_eq!(*value, raw[i] / 0.3048 - raw[0] / 0.3048);
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            normalize_baseline(&[]),
            Err(CompareError::EmptySeries)
        ));
        assert!(matches!(
            Series::from_samples("x.fit", &[], UnitSystem::Metric),
            Err(CompareError::EmptySeries)
        ));
    }

    #[test]
    fn ranges_and_net_change() {
        let series = Series::from_samples("a.fit", &samples(&[50.0, 52.0, 49.0]), UnitSystem::Metric)
            .unwrap();
        assert_eq!(series.elevation_range(), Some((-1.0, 2.0)));
        let (lo, hi) = series.distance_range().unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - 3.218688).abs() < 1e-12);
        assert_eq!(series.net_change(), -1.0);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn order_is_preserved() {
        let raw = vec![
            RawSample {
                distance_m: 2000.0,
                altitude_m: 10.0,
            },
            RawSample {
                distance_m: 1000.0,
                altitude_m: 20.0,
            },
        ];
        let series = Series::from_samples("a.fit", &raw, UnitSystem::Metric).unwrap();
        assert_eq!(series.distances, vec![2.0, 1.0]);
    }
}
