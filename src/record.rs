//! Record Module
//!
//! The externally supplied business record. The feed treats every field as
//! opaque and only requires the payload to be a JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the logical unit of work identifier
pub const LUW_ID_FIELD: &str = "luwId";
/// Field holding the record type
pub const TYPE_FIELD: &str = "type";
/// Field holding the record subject
pub const SUBJECT_FIELD: &str = "subject";
/// Field holding the business date
pub const BUSINESS_DATE_FIELD: &str = "businessDate";

// == Record ==
/// A structured business record, stored verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wraps an already parsed JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Decodes a message body. Anything other than a JSON object is rejected.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Encodes the record for publishing.
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Returns a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn luw_id(&self) -> Option<&Value> {
        self.field(LUW_ID_FIELD)
    }

    pub fn record_type(&self) -> Option<&Value> {
        self.field(TYPE_FIELD)
    }

    pub fn subject(&self) -> Option<&Value> {
        self.field(SUBJECT_FIELD)
    }

    pub fn business_date(&self) -> Option<&Value> {
        self.field(BUSINESS_DATE_FIELD)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
