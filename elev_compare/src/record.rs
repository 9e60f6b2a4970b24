//! Decoder-facing record model.
//!
//! A decoder hands out records one at a time. The stream ends either
//! normally (`None`), or with a single terminal `Err`: a recoverable
//! [`DecodeError::Truncated`] or a [`DecodeError::Fatal`] failure.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

/// Value of a single record field. Invalid or non-numeric values are `Null`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Null,
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Null => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Number)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub kind: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Numeric value of `name`, or `None` when the field is absent or null.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("file is truncated: {0}")]
    Truncated(String),
    #[error("{0}")]
    Fatal(String),
}

impl DecodeError {
    pub fn is_truncation(&self) -> bool {
        matches!(self, DecodeError::Truncated(_))
    }
}

/// Opens a telemetry file as a pull-based record stream.
pub trait RecordDecoder {
    type Stream: Iterator<Item = Result<Record, DecodeError>>;

    fn open(&self, path: &Path) -> Result<Self::Stream, DecodeError>;
}
