//! YAML output formatter

use crate::models::{InterfaceMap, TokenRecord};
use crate::output::FormatError;

/// Format interface map as YAML
pub fn format_yaml(data: &InterfaceMap) -> Result<String, FormatError> {
    serde_yaml::to_string(data).map_err(FormatError::from)
}

/// Format a token dump as YAML
pub fn format_tokens_yaml(tokens: &[TokenRecord]) -> Result<String, FormatError> {
    serde_yaml::to_string(tokens).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::create_test_data;

    #[test]
    fn test_format_yaml() {
        let data = create_test_data();
        let result = format_yaml(&data);
        assert!(result.is_ok());
        let yaml = result.unwrap();
        assert!(yaml.contains("root:"));
        assert!(yaml.contains("files:"));
        assert!(yaml.contains("Foo.swift"));
    }
}
