//! Core types of the order content contract.
//!
//! Every type here is a plain owned value. Values built in memory are valid by
//! construction (offsets are unsigned, discriminants are enum variants); values
//! coming from the wire go through [`crate::contract`] first.

use serde::{Deserialize, Deserializer, Serialize};

/// Default bullet used by list blocks.
pub const DEFAULT_BULLET: &str = "•";

/// Kind of an inline annotation on rich text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEntityType {
    /// A link written out in the text itself (`https://...`).
    Url,
    /// A span of text pointing at a separate `url`.
    TextLink,
}

impl TextEntityType {
    /// Wire discriminants, in declaration order.
    pub const ALL: &'static [&'static str] = &["url", "text_link"];

    /// Wire discriminant of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEntityType::Url => "url",
            TextEntityType::TextLink => "text_link",
        }
    }
}

/// An inline annotation over a span of [`RichText`].
///
/// `offset` and `length` count UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextEntity {
    #[serde(rename = "type")]
    pub kind: TextEntityType,

    /// Start of the span
    pub offset: u64,

    /// Length of the span
    pub length: u64,

    /// Link target, only meaningful for [`TextEntityType::TextLink`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TextEntity {
    /// A bare link spelled out in the text.
    pub fn url(offset: u64, length: u64) -> Self {
        Self {
            kind: TextEntityType::Url,
            offset,
            length,
            url: None,
        }
    }

    /// A span of text linking to `url`.
    pub fn text_link(offset: u64, length: u64, url: impl Into<String>) -> Self {
        Self {
            kind: TextEntityType::TextLink,
            offset,
            length,
            url: Some(url.into()),
        }
    }

    /// Exclusive end of the span, in UTF-16 code units.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }
}

/// Plain text plus ordered inline annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
pub struct RichText {
    pub text: String,

    pub entities: Vec<TextEntity>,
}

impl RichText {
    /// Rich text without any entities.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: Vec::new(),
        }
    }

    /// Rich text with the given entities.
    pub fn new(text: impl Into<String>, entities: Vec<TextEntity>) -> Self {
        Self {
            text: text.into(),
            entities,
        }
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText::plain(text)
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        RichText::plain(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub content: RichText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphBlock {
    pub content: RichText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingBlock {
    pub content: RichText,
}

/// A bulleted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListBlock {
    pub items: Vec<RichText>,

    /// Bullet glyph (default "•")
    pub bullet: String,

    /// Nesting level (default 0)
    pub indent_level: i64,

    /// Render without spacing between items (default true)
    pub tight: bool,
}

impl ListBlock {
    /// A list with default bullet, indent and spacing.
    pub fn new(items: Vec<RichText>) -> Self {
        Self {
            items,
            bullet: DEFAULT_BULLET.to_string(),
            indent_level: 0,
            tight: true,
        }
    }
}

/// One line of a price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    pub name: RichText,

    pub price: RichText,
}

impl PriceRow {
    pub fn new(name: impl Into<RichText>, price: impl Into<RichText>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceTableBlock {
    pub rows: Vec<PriceRow>,
}

/// Pointer to an image held by the external blob store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageRef {
    /// User-facing file name (may be the original upload name)
    pub filename: String,

    /// Opaque storage identifier, e.g. "images/2025/11/20/<id>.jpg"
    pub storage_key: String,
}

impl ImageRef {
    pub fn new(filename: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            storage_key: storage_key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageBlock {
    pub image: ImageRef,

    /// Caption the photo was sent with, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<RichText>,
}

/// One structural unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text(TextBlock),
    Paragraph(ParagraphBlock),
    Heading(HeadingBlock),
    List(ListBlock),
    PriceTable(PriceTableBlock),
    Image(ImageBlock),
}

impl Block {
    /// Wire discriminants, in declaration order.
    pub const KINDS: &'static [&'static str] = &[
        "text",
        "paragraph",
        "heading",
        "list",
        "price_table",
        "image",
    ];

    /// Wire discriminant of this block.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Text(_) => "text",
            Block::Paragraph(_) => "paragraph",
            Block::Heading(_) => "heading",
            Block::List(_) => "list",
            Block::PriceTable(_) => "price_table",
            Block::Image(_) => "image",
        }
    }

    /// All rich text held by this block, in document order.
    pub fn rich_texts(&self) -> Vec<&RichText> {
        match self {
            Block::Text(b) => vec![&b.content],
            Block::Paragraph(b) => vec![&b.content],
            Block::Heading(b) => vec![&b.content],
            Block::List(b) => b.items.iter().collect(),
            Block::PriceTable(b) => b
                .rows
                .iter()
                .flat_map(|row| [&row.name, &row.price])
                .collect(),
            Block::Image(b) => b.caption.iter().collect(),
        }
    }
}

/// Root aggregate: one complete document-content submission for a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Chat the order was assembled in (negative for group chats)
    pub chat_id: i64,

    /// Blocks in document order
    pub items: Vec<Block>,
}

impl Order {
    pub fn new(chat_id: i64, items: Vec<Block>) -> Self {
        Self { chat_id, items }
    }

    /// True when the order has no blocks.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Image references in document order.
    pub fn images(&self) -> Vec<&ImageRef> {
        self.items
            .iter()
            .filter_map(|block| match block {
                Block::Image(image) => Some(&image.image),
                _ => None,
            })
            .collect()
    }

    /// Storage keys the renderer has to fetch before it can lay out the order.
    pub fn storage_keys(&self) -> Vec<&str> {
        self.images()
            .into_iter()
            .map(|image| image.storage_key.as_str())
            .collect()
    }
}

/// Location of a finished output document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentReference {
    /// Chat the document is delivered to
    pub chat_id: i64,

    /// File name shown to the user
    pub filename: String,

    /// Opaque storage identifier of the rendered file
    pub storage_key: String,
}

impl DocumentReference {
    pub fn new(chat_id: i64, filename: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            chat_id,
            filename: filename.into(),
            storage_key: storage_key.into(),
        }
    }
}

// Deserialization goes through the validating parser so serde users cannot
// bypass the checks in `contract`.

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        crate::contract::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for DocumentReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        crate::contract::parse_document_reference(&raw).map_err(serde::de::Error::custom)
    }
}
