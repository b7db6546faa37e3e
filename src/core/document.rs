use crate::utils::error::{Result, UploaderError};
use serde_json::Value;

const BOM: char = '\u{feff}';

/// Decode uploaded bytes into JSON.
///
/// Invalid UTF-8 is replaced rather than rejected and a leading byte order mark is
/// dropped. When the whole text is not a single JSON document it is read as JSON
/// Lines and the lines are returned as an array.
pub fn decode_upload(bytes: &[u8]) -> Result<Value> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix(BOM).unwrap_or(&text);

    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(whole_err) => {
            tracing::debug!("Upload is not a single JSON document ({}), trying JSON Lines", whole_err);
            decode_json_lines(text)
        }
    }
}

fn decode_json_lines(text: &str) -> Result<Value> {
    let mut items = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item = serde_json::from_str::<Value>(line).map_err(|e| UploaderError::ParseError {
            message: format!("line {}: {}", idx + 1, e),
        })?;
        items.push(item);
    }

    if items.is_empty() {
        return Err(UploaderError::ParseError {
            message: "upload is empty".to_string(),
        });
    }

    Ok(Value::Array(items))
}
