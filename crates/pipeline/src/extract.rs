//! Structured extraction from free-form model output.
//!
//! Models wrap JSON in prose, code fences or both. Extraction locates the
//! first balanced `{...}` span (braces inside JSON strings do not count),
//! parses it strictly and insists on an object.

use consilium_core::error::ExtractionError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Locate the first balanced `{...}` span in `text`.
pub fn first_object_span(text: &str) -> Result<&str, ExtractionError> {
    let start = text.find('{').ok_or(ExtractionError::NoObject)?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractionError::Unbalanced { start })
}

/// Extract the first JSON object from `text`.
pub fn extract_object(text: &str) -> Result<Map<String, Value>, ExtractionError> {
    let span = first_object_span(text)?;
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ExtractionError::NotAnObject),
        Err(e) => Err(ExtractionError::InvalidJson(e.to_string())),
    }
}

/// Extract the first JSON object from `text` and deserialize it into `T`.
pub fn extract_as<T: DeserializeOwned>(text: &str) -> Result<T, ExtractionError> {
    let object = extract_object(text)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}
