//! JSON Schema for the configuration file.

use crate::config::PigmentConfig;

/// Generates a JSON Schema for the Pigment configuration.
///
/// The schema includes all configuration options with their types and
/// descriptions.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(PigmentConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!("pigment.schema.json"));
    }

    schema
}

/// Generates a pretty-printed JSON Schema string.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(&print_schema()).unwrap();

        assert_eq!(parsed["$id"], "pigment.schema.json");
        assert_eq!(parsed["title"], "PigmentConfig");
        assert!(parsed["properties"]["outputDirs"].is_object());
        assert!(parsed["properties"]["templatesDir"].is_object());
        assert!(parsed["properties"]["reload"].is_object());
    }

    #[test]
    fn test_schema_describes_hook_timeouts() {
        let schema = print_schema();
        assert!(schema.contains("preTimeoutSecs"));
        assert!(schema.contains("postTimeoutSecs"));
    }
}
