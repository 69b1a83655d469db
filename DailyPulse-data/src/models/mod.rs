// Storage models shared by every backend
pub mod document;

pub use document::{
    apply_write, format_timestamp, number_value, AppliedWrite, Document, DocumentKey, FieldValue,
    SetOptions, WriteError, WriteFields,
};
