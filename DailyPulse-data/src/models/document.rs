use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document: a JSON object of field name to value
pub type Document = Map<String, Value>;

/// Composite key addressing a single document
///
/// Documents live under `collection/userId` and, for per-day records,
/// `collection/userId/date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    /// Collection name (e.g. `foodLogs`)
    pub collection: String,

    /// Owner of the document
    pub user_id: String,

    /// Calendar date (`YYYY-MM-DD`) for per-day documents
    pub date: Option<String>,
}

impl DocumentKey {
    /// Key for a per-day document
    pub fn dated(collection: &str, user_id: &str, date: &str) -> Self {
        Self {
            collection: collection.to_string(),
            user_id: user_id.to_string(),
            date: Some(date.to_string()),
        }
    }

    /// Key for a document scoped to the user only
    pub fn user(collection: &str, user_id: &str) -> Self {
        Self {
            collection: collection.to_string(),
            user_id: user_id.to_string(),
            date: None,
        }
    }

    /// Slash separated path used as the storage primary key
    pub fn path(&self) -> String {
        match &self.date {
            Some(date) => format!("{}/{}/{}", self.collection, self.user_id, date),
            None => format!("{}/{}", self.collection, self.user_id),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Value of a single field in a write
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Concrete JSON value, stored as given
    Value(Value),

    /// Replaced by the server's current time when the write is applied
    ServerTimestamp,

    /// Added to the stored numeric value (absent or non-numeric counts as 0)
    Increment(f64),
}

/// Options controlling how a write combines with the stored document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Keep stored fields that the write does not mention
    pub merge: bool,
}

impl SetOptions {
    /// Field-level union with the stored document
    pub fn merge() -> Self {
        Self { merge: true }
    }

    /// Replace the stored document entirely
    pub fn overwrite() -> Self {
        Self { merge: false }
    }
}

/// Ordered set of fields making up a single write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteFields {
    fields: Vec<(String, FieldValue)>,
}

impl WriteFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a concrete value
    pub fn set(self, name: &str, value: impl Into<Value>) -> Self {
        self.with(name, FieldValue::Value(value.into()))
    }

    /// Set a field to the server timestamp at write time
    pub fn server_timestamp(self, name: &str) -> Self {
        self.with(name, FieldValue::ServerTimestamp)
    }

    /// Atomically add `delta` to a numeric field
    pub fn increment(self, name: &str, delta: f64) -> Self {
        self.with(name, FieldValue::Increment(delta))
    }

    fn with(mut self, name: &str, value: FieldValue) -> Self {
        // Later writes to the same field win
        self.fields.retain(|(existing, _)| existing != name);
        self.fields.push((name.to_string(), value));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of applying a write to a stored document
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedWrite {
    /// Full document to persist
    pub stored: Document,

    /// The written fields with sentinels replaced by concrete values
    pub resolved: Document,
}

/// A write that cannot be applied to the stored document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriteError {
    /// The incremented total is not a finite number
    #[error("{0} total is out of range")]
    NonFiniteTotal(String),
}

/// Resolve `fields` against `existing` and compute the document to persist.
///
/// Both storage backends call this while holding their write lock so the
/// read of `existing` and the persist of `stored` form one atomic step.
/// Nothing is persisted when this fails.
pub fn apply_write(
    existing: Option<&Document>,
    fields: &WriteFields,
    options: SetOptions,
    now: DateTime<Utc>,
) -> Result<AppliedWrite, WriteError> {
    let mut resolved = Document::new();

    for (name, value) in fields.iter() {
        let value = match value {
            FieldValue::Value(value) => value.clone(),
            FieldValue::ServerTimestamp => Value::String(format_timestamp(now)),
            FieldValue::Increment(delta) => {
                let base = existing
                    .and_then(|doc| doc.get(name))
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                let total = base + delta;
                if !total.is_finite() {
                    return Err(WriteError::NonFiniteTotal(name.to_string()));
                }
                number_value(total)
            }
        };
        resolved.insert(name.to_string(), value);
    }

    let stored = if options.merge {
        let mut doc = existing.cloned().unwrap_or_default();
        for (name, value) in &resolved {
            doc.insert(name.clone(), value.clone());
        }
        doc
    } else {
        resolved.clone()
    };

    Ok(AppliedWrite { stored, resolved })
}

/// RFC 3339 rendering used for server timestamps
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// JSON number for `n`, keeping whole numbers integral (350 rather than 350.0)
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
