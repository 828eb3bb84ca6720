//! Strict decoding of persisted records.
//!
//! Documents read back from a store are decoded whole. A missing field or an
//! unknown enum value is a `Validation` error naming the record type.

use crate::errors::{DepotError, Result};
use serde::de::DeserializeOwned;

/// Decode a JSON document into a typed record.
pub fn decode_record<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| {
        DepotError::validation(format!(
            "malformed {} record: {err}",
            short_type_name::<T>()
        ))
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
