//! YAML cleaning for exported session archives
//!
//! Timing exports occasionally carry stray control characters (copied driver names,
//! broken encodings) that make standard YAML parsers reject the whole document.
//! This module cleans the text without parsing it.

use crate::{FeatureError, Result};

/// Remove control characters (except `\n`, `\r`, `\t`) from a YAML document.
///
/// Returns an error when nothing but whitespace remains.
pub fn clean_yaml(yaml: &str) -> Result<String> {
    let cleaned: String = yaml
        .chars()
        .filter(|ch| !matches!(ch, '\x00'..='\x08' | '\x0B'..='\x0C' | '\x0E'..='\x1F' | '\x7F'))
        .collect();

    if cleaned.trim().is_empty() {
        return Err(FeatureError::Parse {
            context: "YAML cleaning".to_string(),
            details: "YAML is empty after cleaning".to_string(),
        });
    }

    Ok(cleaned)
}

/// Strip a UTF-8 byte order mark and decode bytes as UTF-8.
pub fn decode_yaml_bytes(data: &[u8]) -> Result<String> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let yaml = std::str::from_utf8(data).map_err(|e| FeatureError::Parse {
        context: "YAML UTF-8 conversion".to_string(),
        details: e.to_string(),
    })?;
    Ok(yaml.to_string())
}
