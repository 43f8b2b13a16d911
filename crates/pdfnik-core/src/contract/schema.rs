//! JSON Schema for the wire contract.
//!
//! Producers written in other languages validate against
//! `schema/order.schema.json`. The typed parser in this crate remains the
//! authority; the schema is kept in step with it and checked by tests.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded order schema (loaded at compile time).
pub const ORDER_SCHEMA_JSON: &str = include_str!("../../schema/order.schema.json");

static ORDER_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
static DOCUMENT_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

/// The embedded order schema as text.
pub fn order_schema() -> &'static str {
    ORDER_SCHEMA_JSON
}

fn compile(pointer: Option<&str>) -> Result<jsonschema::Validator, String> {
    let mut schema: serde_json::Value = serde_json::from_str(ORDER_SCHEMA_JSON)
        .map_err(|e| format!("Invalid schema JSON: {}", e))?;

    if let Some(pointer) = pointer {
        schema = schema
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| format!("Schema has no definition at {}", pointer))?;
    }

    jsonschema::options()
        .build(&schema)
        .map_err(|e| format!("Failed to compile schema: {}", e))
}

fn order_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    ORDER_VALIDATOR
        .get_or_init(|| compile(None))
        .as_ref()
        .map_err(|e| SchemaError::LoadError(e.clone()))
}

fn document_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    DOCUMENT_VALIDATOR
        .get_or_init(|| compile(Some("/$defs/documentReference")))
        .as_ref()
        .map_err(|e| SchemaError::LoadError(e.clone()))
}

fn collect_errors(
    validator: &jsonschema::Validator,
    instance: &serde_json::Value,
) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an order payload against the schema.
///
/// Returns every schema violation found, not only the first.
pub fn validate_order_schema(order_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = order_validator().map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, order_json)
}

/// Validate a document reference payload against the schema.
pub fn validate_document_schema(document_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = document_validator().map_err(|e| vec![e.to_string()])?;
    collect_errors(validator, document_json)
}

/// Check if an order payload is valid against the schema.
pub fn is_valid_order(order_json: &serde_json::Value) -> bool {
    order_validator()
        .map(|v| v.is_valid(order_json))
        .unwrap_or(false)
}
