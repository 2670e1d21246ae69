//! Validate tool call arguments against their JSON Schema before execution.

use crate::error::ValidationError;

/// Validate tool arguments against a JSON Schema.
///
/// Checks the top-level type, required field presence, property types and
/// the element type of array properties. Returns the first violation found.
pub fn validate_arguments(
    args: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), ValidationError> {
    if let Some(schema_type) = schema.get("type").and_then(|v| v.as_str()) {
        if schema_type == "object" && !args.is_object() {
            return Err(ValidationError::type_mismatch("arguments", "object", args));
        }
    }

    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
        for name in required.iter().filter_map(|f| f.as_str()) {
            if !obj.contains_key(name) {
                return Err(ValidationError::value(name, "missing required field"));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(|v| v.as_object()) else {
        return Ok(());
    };

    for (key, value) in obj {
        let Some(prop_schema) = properties.get(key) else {
            continue;
        };
        check_type(key, value, prop_schema)?;
        if let (Some(items), Some(item_schema)) = (value.as_array(), prop_schema.get("items")) {
            for item in items {
                check_type(key, item, item_schema)?;
            }
        }
    }

    Ok(())
}

fn check_type(
    key: &str,
    value: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), ValidationError> {
    match schema.get("type").and_then(|v| v.as_str()) {
        Some(expected) if !value_matches_type(value, expected) => {
            Err(ValidationError::type_mismatch(key, expected, value))
        }
        _ => Ok(()),
    }
}

fn value_matches_type(value: &serde_json::Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}
