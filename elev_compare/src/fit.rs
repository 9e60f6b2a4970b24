//! FIT container adapter built on `fitparser`'s incremental stream processor.
//!
//! Messages are decoded one at a time so that a file cut short still yields
//! every record that precedes the damage.

use std::fs;
use std::path::Path;

use fitparser::de::{DecodeOption, FitObject, FitStreamProcessor};
use fitparser::{ErrorKind, FitDataRecord};
use tracing::debug;

use crate::record::{DecodeError, FieldValue, Record, RecordDecoder};

/// Bytes of the header fields needed to learn the declared section length.
const MIN_HEADER_LEN: usize = 12;
const CRC_LEN: usize = 2;

/// Reads FIT files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FitDecoder;

impl RecordDecoder for FitDecoder {
    type Stream = FitRecordStream;

    fn open(&self, path: &Path) -> Result<FitRecordStream, DecodeError> {
        let data = fs::read(path)
            .map_err(|e| DecodeError::Fatal(format!("failed to read {}: {}", path.display(), e)))?;
        Ok(FitRecordStream::new(data))
    }
}

pub struct FitRecordStream {
    data: Vec<u8>,
    offset: usize,
    processor: FitStreamProcessor,
    /// Byte offset one past the CRC of the section being decoded.
    section_end: usize,
    in_section: bool,
    sections_done: usize,
    finished: bool,
}

impl FitRecordStream {
    pub fn new(data: Vec<u8>) -> Self {
        let mut processor = FitStreamProcessor::new();
        processor.add_option(DecodeOption::SkipHeaderCrcValidation);
        processor.add_option(DecodeOption::SkipDataCrcValidation);
        Self {
            data,
            offset: 0,
            processor,
            section_end: 0,
            in_section: false,
            sections_done: 0,
            finished: false,
        }
    }

    fn fail(&mut self, err: DecodeError) -> Option<Result<Record, DecodeError>> {
        self.finished = true;
        Some(Err(err))
    }

    fn classify(&self, err: fitparser::Error) -> DecodeError {
        let message = err.to_string();
        let short_file = self.data.len() < self.section_end;
        match &*err {
            ErrorKind::UnexpectedEof(_) => DecodeError::Truncated(message),
            ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                DecodeError::Truncated(message)
            }
            _ if short_file => DecodeError::Truncated(message),
            _ => DecodeError::Fatal(message),
        }
    }
}

impl Iterator for FitRecordStream {
    type Item = Result<Record, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            if self.offset >= self.data.len() {
                if self.in_section || self.sections_done == 0 {
                    return self.fail(DecodeError::Truncated(format!(
                        "input ended at byte {} before the data section was complete",
                        self.offset
                    )));
                }
                self.finished = true;
                return None;
            }

            if !self.in_section {
                match declared_section_len(&self.data[self.offset..]) {
                    Some(len) => self.section_end = self.offset + len,
                    None if self.sections_done > 0 => {
                        debug!(
                            "ignoring {} trailing bytes after FIT data",
                            self.data.len() - self.offset
                        );
                        self.finished = true;
                        return None;
                    }
                    None => {
                        return self.fail(DecodeError::Truncated(
                            "file is too short to hold a FIT header".into(),
                        ))
                    }
                }
            }

            let input = &self.data[self.offset..];
            let (consumed, object) = match self.processor.deserialize_next(input) {
                Ok((remaining, object)) => (input.len() - remaining.len(), object),
                Err(err) => {
                    let classified = self.classify(err);
                    return self.fail(classified);
                }
            };
            self.offset += consumed;

            match object {
                FitObject::Header(_) => self.in_section = true,
                FitObject::DefinitionMessage(_) => {}
                FitObject::Crc(_) => {
                    self.in_section = false;
                    self.sections_done += 1;
                    self.processor.reset();
                }
                FitObject::DataMessage(message) => {
                    return match self.processor.decode_message(message) {
                        Ok(record) => Some(Ok(to_record(&record))),
                        Err(err) => {
                            let classified = self.classify(err);
                            self.fail(classified)
                        }
                    };
                }
            }
        }
    }
}

/// Total section length (header + data + CRC) declared by the header at the
/// start of `bytes`, or `None` when there are too few bytes to tell.
fn declared_section_len(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < MIN_HEADER_LEN {
        return None;
    }
    let header_size = bytes[0] as usize;
    let data_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    Some(header_size + data_size + CRC_LEN)
}

/// Enhanced fields paired with the plain name they supersede. The profile
/// expands record altitude (#2) into `enhanced_altitude` only.
const ENHANCED_FIELDS: [(&str, &str); 3] = [
    ("enhanced_altitude", "altitude"),
    ("enhanced_distance", "distance"),
    ("enhanced_speed", "speed"),
];

fn to_record(record: &FitDataRecord) -> Record {
    let mut out = Record::new(record.kind().to_string());
    for field in record.fields() {
        out.fields.insert(
            field.name().to_string(),
            FieldValue::from(fit_value_to_f64(field.value())),
        );
    }
    for (enhanced, plain) in ENHANCED_FIELDS {
        if let Some(value) = out.number(enhanced) {
            out.fields.insert(plain.to_string(), FieldValue::Number(value));
        }
    }
    out
}

fn fit_value_to_f64(value: &fitparser::Value) -> Option<f64> {
    let number = match value {
        fitparser::Value::Float32(v) => Some(*v as f64),
        fitparser::Value::Float64(v) => Some(*v),
        fitparser::Value::SInt8(v) => Some(*v as f64),
        fitparser::Value::SInt16(v) => Some(*v as f64),
        fitparser::Value::SInt32(v) => Some(*v as f64),
        fitparser::Value::SInt64(v) => Some(*v as f64),
        fitparser::Value::UInt8(v) => Some(*v as f64),
        fitparser::Value::UInt8z(v) => Some(*v as f64),
        fitparser::Value::UInt16(v) => Some(*v as f64),
        fitparser::Value::UInt16z(v) => Some(*v as f64),
        fitparser::Value::UInt32(v) => Some(*v as f64),
        fitparser::Value::UInt32z(v) => Some(*v as f64),
        fitparser::Value::UInt64(v) => Some(*v as f64),
        fitparser::Value::UInt64z(v) => Some(*v as f64),
        fitparser::Value::Byte(v) => Some(*v as f64),
        fitparser::Value::Array(values) => values.iter().find_map(fit_value_to_f64),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}
