//! Model response parser
//!
//! Extracts the JSON array from the model text and validates it as a list
//! of [`MaterialEstimate`] rows. Nothing is defaulted: missing required
//! fields, empty text and empty arrays are all errors.

use crate::error::{Error, Result};
use crate::types::MaterialEstimate;

/// Extract the JSON array of a response
///
/// Accepted shapes:
/// 1. the whole (trimmed) text is an array
/// 2. a ```json ... ``` block whose content is an array
///
/// Anything else, including an array buried in prose or wrapped in an
/// object, is a parse error.
///
/// # Examples
/// ```
/// use jacket_ai_common::extract_json;
///
/// let response = "[{\"size\": \"M\"}]";
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("size"));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    let trimmed = response.trim();
    if trimmed.starts_with('[') {
        return Ok(trimmed);
    }

    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json"
        if let Some(end_offset) = response[start..].find("```") {
            let fenced = response[start..start + end_offset].trim();
            if fenced.starts_with('[') {
                return Ok(fenced);
            }
        }
    }

    Err(Error::Parse("response is not a JSON array".into()))
}

/// Parse the estimate rows out of a model response
///
/// # Returns
/// * `Ok(Vec<MaterialEstimate>)` - at least one well-formed row
/// * `Err(Error::EmptyResponse)` - blank text
/// * `Err(Error::Parse)` - no JSON array or a row violating the schema
/// * `Err(Error::NoEstimates)` - an empty array
pub fn parse_estimates(response: &str) -> Result<Vec<MaterialEstimate>> {
    if response.trim().is_empty() {
        return Err(Error::EmptyResponse);
    }

    let json_str = extract_json(response)?;
    let rows: Vec<MaterialEstimate> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("estimate JSON does not match the expected shape: {}", e)))?;

    if rows.is_empty() {
        return Err(Error::NoEstimates);
    }

    Ok(rows)
}
