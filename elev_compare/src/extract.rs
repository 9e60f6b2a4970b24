use tracing::{debug, warn};

use crate::record::{DecodeError, Record};

/// One (distance, altitude) pair in metres, straight from the decoder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawSample {
    pub distance_m: f64,
    pub altitude_m: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    pub samples: Vec<RawSample>,
    /// Set when the stream ended early on a truncated container.
    pub truncated: bool,
    pub records_seen: usize,
}

/// Collect every record that carries both named fields with non-null values.
///
/// A truncation error ends extraction with the samples gathered so far and a
/// warning naming `label`. Any other decoder error is returned as-is.
pub fn extract_samples<I>(
    records: I,
    distance_field: &str,
    altitude_field: &str,
    label: &str,
) -> Result<Extraction, DecodeError>
where
    I: IntoIterator<Item = Result<Record, DecodeError>>,
{
    let mut out = Extraction::default();
    for item in records {
        let record = match item {
            Ok(record) => record,
            Err(DecodeError::Truncated(reason)) => {
                warn!(
                    "Truncated FIT file {}, data may be incomplete ({})",
                    label, reason
                );
                out.truncated = true;
                break;
            }
            Err(err) => return Err(err),
        };
        out.records_seen += 1;
        if let (Some(distance_m), Some(altitude_m)) =
            (record.number(distance_field), record.number(altitude_field))
        {
            out.samples.push(RawSample {
                distance_m,
                altitude_m,
            });
        }
    }
    debug!(
        "{}: {} of {} records carried {}/{}",
        label,
        out.samples.len(),
        out.records_seen,
        distance_field,
        altitude_field
    );
    Ok(out)
}
