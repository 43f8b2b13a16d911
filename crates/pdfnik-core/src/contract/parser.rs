//! Loading orders and document references from JSON/YAML text and files.

use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::error::ValidationError;
use super::validate::{ParseOptions, Parser};
use crate::types::{DocumentReference, Order};

/// Errors that can occur when loading a payload.
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Failed to read payload file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Parse an untyped payload into an [`Order`].
pub fn parse(raw: &Value) -> Result<Order, ValidationError> {
    parse_with(raw, &ParseOptions::default())
}

/// Parse an untyped payload into an [`Order`] with explicit options.
pub fn parse_with(raw: &Value, options: &ParseOptions) -> Result<Order, ValidationError> {
    match Parser::new(*options).order(raw) {
        Ok(order) => {
            tracing::debug!(
                chat_id = order.chat_id,
                blocks = order.items.len(),
                "Order accepted"
            );
            Ok(order)
        }
        Err(e) => {
            tracing::debug!(field = e.field(), kind = ?e.kind(), "Order rejected");
            Err(e)
        }
    }
}

/// Parse an untyped payload into a [`DocumentReference`].
pub fn parse_document_reference(raw: &Value) -> Result<DocumentReference, ValidationError> {
    let result = Parser::default().document_reference(raw);
    if let Err(e) = &result {
        tracing::debug!(field = e.field(), kind = ?e.kind(), "Document reference rejected");
    }
    result
}

/// Map an [`Order`] back to its wire form.
pub fn serialize(order: &Order) -> Result<Value, ContractError> {
    Ok(serde_json::to_value(order)?)
}

impl Order {
    /// Parse an order from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        let raw: Value = serde_json::from_str(json)?;
        Ok(parse(&raw)?)
    }

    /// Parse an order from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ContractError> {
        let raw: Value = serde_yaml::from_str(yaml)?;
        Ok(parse(&raw)?)
    }

    /// Parse an order from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse an order from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn to_value(&self) -> Result<Value, ContractError> {
        serialize(self)
    }

    pub fn to_json(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl DocumentReference {
    /// Parse a document reference from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        let raw: Value = serde_json::from_str(json)?;
        Ok(parse_document_reference(&raw)?)
    }

    /// Parse a document reference from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ContractError> {
        let raw: Value = serde_yaml::from_str(yaml)?;
        Ok(parse_document_reference(&raw)?)
    }

    /// Parse a document reference from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a document reference from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn to_value(&self) -> Result<Value, ContractError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
