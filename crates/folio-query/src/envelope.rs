//! FOLIO collection response bodies.
//!
//! Collection endpoints answer with an object holding `totalRecords` and one
//! array of records whose key varies by endpoint (`users`, `results`, ...).
//! The records are the first array in document order.

use crate::error::EnvelopeError;
use serde_json::Value;

/// A decoded collection response
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub total_records: u64,
    /// Key the records were found under
    pub key: String,
    pub records: Vec<Value>,
}

impl Envelope {
    pub fn from_value(body: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(map) = body else {
            return Err(EnvelopeError::NotAnObject);
        };

        let total_records = map
            .get("totalRecords")
            .and_then(Value::as_u64)
            .ok_or(EnvelopeError::MissingTotalRecords)?;

        let (key, records) = map
            .into_iter()
            .find_map(|(key, value)| match value {
                Value::Array(records) => Some((key, records)),
                _ => None,
            })
            .ok_or(EnvelopeError::MissingRecords)?;

        Ok(Self {
            total_records,
            key,
            records,
        })
    }

    /// `id` of the last record, the cursor for the next id page
    pub fn last_id(&self) -> Option<&str> {
        self.records.last()?.get("id")?.as_str()
    }
}
