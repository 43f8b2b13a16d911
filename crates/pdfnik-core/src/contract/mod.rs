//! Contract parsing and validation.
//!
//! Orders arrive as untyped JSON/YAML from the chat front end. This module is
//! the single place where such payloads become typed values: the parser
//! resolves discriminants, applies defaults, and reports precise paths for
//! anything it rejects.

mod error;
mod parser;
pub mod schema;
mod validate;

pub use error::{ErrorKind, ValidationError};
pub use parser::{parse, parse_document_reference, parse_with, serialize, ContractError};
pub use validate::{ParseOptions, Parser};
