//! # pdfnik-core
//!
//! Validated content contracts for PDF orders.
//!
//! A chat front end collects messages (text, photos, price lists) and hands
//! them to a document generator as an [`Order`]: a chat id plus an ordered
//! list of typed [`Block`]s. This crate defines that interchange format and
//! the one boundary where untrusted payloads become typed values.
//!
//! ## Key Guarantees
//!
//! 1. **All-or-nothing**: a payload either parses completely or is rejected
//! 2. **Precise diagnostics**: every rejection names the field path and reason
//! 3. **Self-describing output**: serialized blocks and entities always carry
//!    their `type` discriminant and parse back to equal values
//! 4. **Pure**: parsing and serialization hold no state and perform no I/O
//!
//! ## Example
//!
//! ```rust
//! use pdfnik_core::{parse, serialize, Block};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "chat_id": 42,
//!     "items": [{"type": "list", "items": [{"text": "a"}]}]
//! });
//!
//! let order = parse(&raw)?;
//! match &order.items[0] {
//!     Block::List(list) => assert_eq!(list.bullet, "•"),
//!     other => panic!("unexpected block {}", other.kind()),
//! }
//!
//! assert_eq!(parse(&serialize(&order)?)?, order);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod contract;
pub mod entities;
pub mod storage;
pub mod types;

// Re-export main types at crate root
pub use builder::OrderBuilder;
pub use contract::{
    parse, parse_document_reference, parse_with, serialize, ContractError, ErrorKind,
    ParseOptions, ValidationError,
};
pub use entities::{detect_urls, utf16_len};
pub use types::{
    Block, DocumentReference, HeadingBlock, ImageBlock, ImageRef, ListBlock, Order,
    ParagraphBlock, PriceRow, PriceTableBlock, RichText, TextBlock, TextEntity, TextEntityType,
    DEFAULT_BULLET,
};
