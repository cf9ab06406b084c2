//! Record sets: ordered scalar values stored as newline-delimited text.
//!
//! A leaf resource holds one record set. On the wire every record is its
//! canonical text form followed by `\n`, including the last one, so an empty
//! set serializes to an empty string and `["x"]` serializes to `"x\n"`.

use derive_more::Display;
use serde::Deserialize;
use serde::Serialize;

/// One opaque scalar value of a record set.
///
/// The wire format is untyped text, so reading a resource always yields
/// [`Record::Text`] fragments; the typed variants exist for callers that
/// publish non-string scalars. Serde representation is untagged, matching
/// the JSON scalars a hosting framework would hand over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(untagged)]
pub enum Record {
    /// boolean scalar
    #[display("{_0}")]
    Bool(bool),
    /// integer scalar
    #[display("{_0}")]
    Integer(i64),
    /// floating-point scalar
    #[display("{_0}")]
    Float(f64),
    /// plain text
    #[display("{_0}")]
    Text(String),
}

impl From<bool> for Record {
    fn from(value: bool) -> Self {
        Record::Bool(value)
    }
}

impl From<i64> for Record {
    fn from(value: i64) -> Self {
        Record::Integer(value)
    }
}

impl From<f64> for Record {
    fn from(value: f64) -> Self {
        Record::Float(value)
    }
}

impl From<&str> for Record {
    fn from(value: &str) -> Self {
        Record::Text(value.to_owned())
    }
}

impl From<String> for Record {
    fn from(value: String) -> Self {
        Record::Text(value)
    }
}

/// Serialize a record set into its wire form.
///
/// Every record's text is followed by one `\n`, including the last.
pub fn serialize_records(records: &[Record]) -> String {
    let mut body = String::new();
    for record in records {
        body.push_str(&record.to_string());
        body.push('\n');
    }
    body
}

/// Parse a resource body into text records, one per line.
///
/// The inverse of [`serialize_records`]: an empty body parses to an empty
/// set, not to a set holding one empty string.
pub fn parse_records(body: &str) -> Vec<Record> {
    body.lines().map(Record::from).collect()
}
