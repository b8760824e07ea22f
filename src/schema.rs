use jsonschema::validator_for;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("{0}")]
    ValidationFailed(String),
}

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
///
/// On failure the error carries the first violation, prefixed with its
/// instance path so the caller can surface a useful `Invalid params` message.
pub fn validate_json(schema: &Value, instance: &Value) -> Result<(), SchemaValidationError> {
    let validator =
        validator_for(schema).map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    match validator.validate(instance) {
        Ok(()) => Ok(()),
        Err(err) => {
            let path = err.instance_path().to_string();
            let detail = if path.is_empty() {
                err.to_string()
            } else {
                format!("{path}: {err}")
            };
            Err(SchemaValidationError::ValidationFailed(detail))
        }
    }
}
