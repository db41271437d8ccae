//! JSON output formatter

use crate::models::{InterfaceMap, TokenRecord};
use crate::output::FormatError;

/// Format interface map as pretty JSON
pub fn format_json(data: &InterfaceMap) -> Result<String, FormatError> {
    serde_json::to_string_pretty(data).map_err(FormatError::from)
}

/// Format a token dump as pretty JSON
pub fn format_tokens_json(tokens: &[TokenRecord]) -> Result<String, FormatError> {
    serde_json::to_string_pretty(tokens).map_err(FormatError::from)
}
