use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Identifier for every stored record.
///
/// Identifiers are 24-character lowercase hex strings laid out like MongoDB
/// object ids. They are always generated server-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

/// Error returned when a string is not a well-formed [`RecordId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid object id: {0:?}")]
pub struct InvalidRecordId(pub String);

impl RecordId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new().to_hex())
    }

    /// Parses an identifier, trimming surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, InvalidRecordId> {
        let trimmed = value.trim();
        ObjectId::parse_str(trimmed)
            .map(|oid| Self(oid.to_hex()))
            .map_err(|_| InvalidRecordId(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
