//! Validating parser from untyped JSON values to contract types.
//!
//! The parser walks a `serde_json::Value` and builds typed values, tracking
//! the path of every field it visits so failures point at the exact location.
//! Discriminants are always resolved before any variant-specific field is read.

use serde_json::{Map, Value};

use super::error::ValidationError;
use crate::entities::utf16_len;
use crate::types::{
    Block, DocumentReference, HeadingBlock, ImageBlock, ImageRef, ListBlock, Order,
    ParagraphBlock, PriceRow, PriceTableBlock, RichText, TextBlock, TextEntity, TextEntityType,
    DEFAULT_BULLET,
};

/// Knobs for [`Parser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject entities whose span runs past the end of their text.
    ///
    /// Off by default: producers are known to send such spans and consumers
    /// clamp them.
    pub strict_entity_bounds: bool,
}

impl ParseOptions {
    /// Options with entity bounds checking enabled.
    pub fn strict() -> Self {
        Self {
            strict_entity_bounds: true,
        }
    }
}

/// Builds typed contract values from untrusted JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParseOptions,
}

/// Block discriminant resolved from the wire `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Text,
    Paragraph,
    Heading,
    List,
    PriceTable,
    Image,
}

const BLOCK_VARIANTS: &[(&str, BlockKind)] = &[
    ("text", BlockKind::Text),
    ("paragraph", BlockKind::Paragraph),
    ("heading", BlockKind::Heading),
    ("list", BlockKind::List),
    ("price_table", BlockKind::PriceTable),
    ("image", BlockKind::Image),
];

const ENTITY_VARIANTS: &[(&str, TextEntityType)] = &[
    ("url", TextEntityType::Url),
    ("text_link", TextEntityType::TextLink),
];

impl Parser {
    /// A parser applying `options` to every payload it reads.
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse an [`Order`].
    pub fn order(&self, raw: &Value) -> Result<Order, ValidationError> {
        let obj = Fields::new(raw, String::new())?;
        let chat_id = obj.integer("chat_id")?;

        let (items_path, items) = obj.array("items")?;
        let items = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.block(item, index(&items_path, i)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Order { chat_id, items })
    }

    /// Parse a [`DocumentReference`].
    pub fn document_reference(&self, raw: &Value) -> Result<DocumentReference, ValidationError> {
        let obj = Fields::new(raw, String::new())?;
        Ok(DocumentReference {
            chat_id: obj.integer("chat_id")?,
            filename: obj.string("filename")?,
            storage_key: obj.string("storage_key")?,
        })
    }

    fn block(&self, raw: &Value, path: String) -> Result<Block, ValidationError> {
        let obj = Fields::new(raw, path)?;
        let kind = obj.discriminant(BLOCK_VARIANTS, Block::KINDS)?;

        let block = match kind {
            BlockKind::Text => Block::Text(TextBlock {
                content: self.rich_text_field(&obj, "content")?,
            }),
            BlockKind::Paragraph => Block::Paragraph(ParagraphBlock {
                content: self.rich_text_field(&obj, "content")?,
            }),
            BlockKind::Heading => Block::Heading(HeadingBlock {
                content: self.rich_text_field(&obj, "content")?,
            }),
            BlockKind::List => Block::List(self.list(&obj)?),
            BlockKind::PriceTable => Block::PriceTable(self.price_table(&obj)?),
            BlockKind::Image => Block::Image(self.image(&obj)?),
        };

        Ok(block)
    }

    fn list(&self, obj: &Fields<'_>) -> Result<ListBlock, ValidationError> {
        let (items_path, items) = obj.array("items")?;
        let items = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.rich_text(item, index(&items_path, i)))
            .collect::<Result<Vec<_>, _>>()?;

        let bullet = match obj.optional("bullet") {
            Some(_) => obj.string("bullet")?,
            None => DEFAULT_BULLET.to_string(),
        };
        let indent_level = match obj.optional("indent_level") {
            Some(_) => obj.integer("indent_level")?,
            None => 0,
        };
        let tight = match obj.optional("tight") {
            Some(_) => obj.boolean("tight")?,
            None => true,
        };

        Ok(ListBlock {
            items,
            bullet,
            indent_level,
            tight,
        })
    }

    fn price_table(&self, obj: &Fields<'_>) -> Result<PriceTableBlock, ValidationError> {
        let (rows_path, rows) = obj.array("rows")?;
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let row = Fields::new(row, index(&rows_path, i))?;
                Ok(PriceRow {
                    name: self.rich_text_field(&row, "name")?,
                    price: self.rich_text_field(&row, "price")?,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(PriceTableBlock { rows })
    }

    fn image(&self, obj: &Fields<'_>) -> Result<ImageBlock, ValidationError> {
        let image = Fields::new(obj.required("image")?, obj.path_of("image"))?;
        let image = ImageRef {
            filename: image.string("filename")?,
            storage_key: image.string("storage_key")?,
        };

        let caption = match obj.optional("caption") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(self.rich_text(raw, obj.path_of("caption"))?),
        };

        Ok(ImageBlock { image, caption })
    }

    fn rich_text_field(&self, obj: &Fields<'_>, key: &str) -> Result<RichText, ValidationError> {
        self.rich_text(obj.required(key)?, obj.path_of(key))
    }

    fn rich_text(&self, raw: &Value, path: String) -> Result<RichText, ValidationError> {
        let obj = Fields::new(raw, path)?;
        let text = obj.string("text")?;

        let entities = match obj.optional("entities") {
            None => Vec::new(),
            Some(_) => {
                let (entities_path, entities) = obj.array("entities")?;
                entities
                    .iter()
                    .enumerate()
                    .map(|(i, entity)| self.entity(entity, index(&entities_path, i)))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        if self.options.strict_entity_bounds {
            let text_len = utf16_len(&text);
            if let Some(i) = entities.iter().position(|e| e.end() > text_len) {
                return Err(ValidationError::ConstraintViolation {
                    field: index(&obj.path_of("entities"), i),
                    constraint: format!("offset + length <= {} (UTF-16 length of text)", text_len),
                });
            }
        }

        Ok(RichText { text, entities })
    }

    fn entity(&self, raw: &Value, path: String) -> Result<TextEntity, ValidationError> {
        let obj = Fields::new(raw, path)?;
        let kind = obj.discriminant(ENTITY_VARIANTS, TextEntityType::ALL)?;

        let offset = obj.non_negative("offset")?;
        let length = obj.non_negative("length")?;
        let url = match obj.optional("url") {
            None | Some(Value::Null) => None,
            Some(_) => Some(obj.string("url")?),
        };

        Ok(TextEntity {
            kind,
            offset,
            length,
            url,
        })
    }
}

/// Path of element `i` under `parent`.
fn index(parent: &str, i: usize) -> String {
    format!("{}[{}]", parent, i)
}

/// Path of field `key` under `parent`.
fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

/// JSON type name used in diagnostics.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: display_path(path),
        expected,
        actual: type_name(found),
    }
}

/// Typed access to the fields of one JSON object.
struct Fields<'v> {
    map: &'v Map<String, Value>,
    path: String,
}

impl<'v> Fields<'v> {
    fn new(raw: &'v Value, path: String) -> Result<Self, ValidationError> {
        match raw {
            Value::Object(map) => Ok(Self { map, path }),
            other => Err(mismatch(&path, "object", other)),
        }
    }

    fn path_of(&self, key: &str) -> String {
        join(&self.path, key)
    }

    fn optional(&self, key: &str) -> Option<&'v Value> {
        self.map.get(key)
    }

    fn required(&self, key: &str) -> Result<&'v Value, ValidationError> {
        self.map
            .get(key)
            .ok_or_else(|| ValidationError::MissingField {
                field: self.path_of(key),
            })
    }

    /// Resolve the `type` tag against the known discriminants.
    ///
    /// `expected` lists the wire names reported when the tag is unknown.
    fn discriminant<T: Copy>(
        &self,
        variants: &[(&str, T)],
        expected: &'static [&'static str],
    ) -> Result<T, ValidationError> {
        let unknown = |found: String| ValidationError::UnknownVariant {
            field: self.path_of("type"),
            found,
            expected,
        };

        match self.map.get("type") {
            None => Err(unknown("missing".to_string())),
            Some(Value::String(tag)) => variants
                .iter()
                .find(|(name, _)| *name == tag.as_str())
                .map(|(_, variant)| *variant)
                .ok_or_else(|| unknown(format!("{:?}", tag))),
            Some(other) => Err(unknown(other.to_string())),
        }
    }

    fn string(&self, key: &str) -> Result<String, ValidationError> {
        match self.required(key)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(&self.path_of(key), "string", other)),
        }
    }

    fn boolean(&self, key: &str) -> Result<bool, ValidationError> {
        match self.required(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(&self.path_of(key), "boolean", other)),
        }
    }

    fn integer(&self, key: &str) -> Result<i64, ValidationError> {
        match self.required(key)? {
            Value::Number(n) if n.is_i64() => n
                .as_i64()
                .ok_or_else(|| mismatch(&self.path_of(key), "integer", &Value::Number(n.clone()))),
            Value::Number(n) if n.is_u64() => Err(ValidationError::ConstraintViolation {
                field: self.path_of(key),
                constraint: format!("{} does not fit in a signed 64-bit integer", n),
            }),
            other => Err(mismatch(&self.path_of(key), "integer", other)),
        }
    }

    fn non_negative(&self, key: &str) -> Result<u64, ValidationError> {
        match self.required(key)? {
            Value::Number(n) if n.is_u64() => n
                .as_u64()
                .ok_or_else(|| mismatch(&self.path_of(key), "integer", &Value::Number(n.clone()))),
            Value::Number(n) if n.is_i64() => Err(ValidationError::ConstraintViolation {
                field: self.path_of(key),
                constraint: format!(">= 0 (got {})", n),
            }),
            other => Err(mismatch(&self.path_of(key), "integer", other)),
        }
    }

    fn array(&self, key: &str) -> Result<(String, &'v Vec<Value>), ValidationError> {
        let path = self.path_of(key);
        match self.required(key)? {
            Value::Array(items) => Ok((path, items)),
            other => Err(mismatch(&path, "array", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ErrorKind;
    use serde_json::json;

    fn parse(raw: Value) -> Result<Order, ValidationError> {
        Parser::new(ParseOptions::default()).order(&raw)
    }

    fn parse_block(block: Value) -> Result<Block, ValidationError> {
        parse(json!({"chat_id": 1, "items": [block]})).map(|mut order| order.items.remove(0))
    }

    #[test]
    fn test_empty_order() {
        let order = parse(json!({"chat_id": 42, "items": []})).unwrap();
        assert_eq!(order.chat_id, 42);
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_negative_chat_id_is_accepted() {
        let order = parse(json!({"chat_id": -1001234567890i64, "items": []})).unwrap();
        assert_eq!(order.chat_id, -1001234567890);
    }

    #[test]
    fn test_root_must_be_object() {
        let err = parse(json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "$".to_string(),
                expected: "object",
                actual: "array",
            }
        );
    }

    #[test]
    fn test_missing_chat_id() {
        let err = parse(json!({"items": []})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "chat_id".to_string()
            }
        );
    }

    #[test]
    fn test_chat_id_type_mismatch() {
        let err = parse(json!({"chat_id": "42", "items": []})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "chat_id".to_string(),
                expected: "integer",
                actual: "string",
            }
        );

        let err = parse(json!({"chat_id": 4.5, "items": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_chat_id_overflow() {
        let err = parse(json!({"chat_id": u64::MAX, "items": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(err.field(), "chat_id");
    }

    #[test]
    fn test_unknown_discriminant_takes_precedence() {
        let err = parse_block(json!({"type": "bogus", "content": {"text": "hi"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
        assert_eq!(err.field(), "items[0].type");

        // Even when the variant fields are broken too
        let err = parse_block(json!({"type": "bogus", "content": 5})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    }

    #[test]
    fn test_missing_discriminant() {
        let err = parse_block(json!({"content": {"text": "hi"}})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownVariant { ref found, .. } if found == "missing"
        ));
    }

    #[test]
    fn test_non_string_discriminant() {
        let err = parse_block(json!({"type": 3, "content": {"text": "hi"}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    }

    #[test]
    fn test_text_like_blocks() {
        for kind in ["text", "paragraph", "heading"] {
            let block = parse_block(json!({"type": kind, "content": {"text": "hello"}})).unwrap();
            assert_eq!(block.kind(), kind);
            assert_eq!(block.rich_texts()[0].text, "hello");
        }
    }

    #[test]
    fn test_list_defaults() {
        let block = parse_block(json!({"type": "list", "items": [{"text": "a"}]})).unwrap();
        let Block::List(list) = block else {
            panic!("expected list block");
        };
        assert_eq!(list.items, vec![RichText::plain("a")]);
        assert_eq!(list.bullet, "•");
        assert_eq!(list.indent_level, 0);
        assert!(list.tight);
    }

    #[test]
    fn test_list_explicit_values() {
        let block = parse_block(json!({
            "type": "list",
            "items": [],
            "bullet": "-",
            "indent_level": 2,
            "tight": false
        }))
        .unwrap();
        let Block::List(list) = block else {
            panic!("expected list block");
        };
        assert_eq!(list.bullet, "-");
        assert_eq!(list.indent_level, 2);
        assert!(!list.tight);
    }

    #[test]
    fn test_null_does_not_trigger_default() {
        let err = parse_block(json!({"type": "list", "items": [], "bullet": null})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                field: "items[0].bullet".to_string(),
                expected: "string",
                actual: "null",
            }
        );

        let err = parse_block(json!({"type": "text", "content": {"text": "a", "entities": null}}))
            .unwrap_err();
        assert_eq!(err.field(), "items[0].content.entities");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_nested_price_row_failure_path() {
        let err = parse_block(json!({
            "type": "price_table",
            "rows": [
                {"name": {"text": "Tea"}, "price": {"text": "2"}},
                {"name": {"text": "Cake"}, "price": {}}
            ]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "items[0].rows[1].price.text".to_string()
            }
        );
    }

    #[test]
    fn test_image_with_and_without_caption() {
        let block = parse_block(json!({
            "type": "image",
            "image": {"filename": "cat.jpg", "storage_key": "images/2025/11/20/abc.jpg"}
        }))
        .unwrap();
        let Block::Image(image) = block else {
            panic!("expected image block");
        };
        assert_eq!(image.image.storage_key, "images/2025/11/20/abc.jpg");
        assert!(image.caption.is_none());

        let block = parse_block(json!({
            "type": "image",
            "image": {"filename": "cat.jpg", "storage_key": "k"},
            "caption": null
        }))
        .unwrap();
        assert!(matches!(block, Block::Image(ImageBlock { caption: None, .. })));

        let block = parse_block(json!({
            "type": "image",
            "image": {"filename": "cat.jpg", "storage_key": "k"},
            "caption": {"text": "my cat"}
        }))
        .unwrap();
        let Block::Image(image) = block else {
            panic!("expected image block");
        };
        assert_eq!(image.caption, Some(RichText::plain("my cat")));
    }

    #[test]
    fn test_image_ref_missing_storage_key() {
        let err = parse_block(json!({"type": "image", "image": {"filename": "a.jpg"}})).unwrap_err();
        assert_eq!(err.field(), "items[0].image.storage_key");
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn test_negative_offset() {
        let err = parse_block(json!({
            "type": "text",
            "content": {"text": "abc", "entities": [{"type": "url", "offset": -1, "length": 1}]}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(err.field(), "items[0].content.entities[0].offset");
    }

    #[test]
    fn test_unknown_entity_type() {
        let err = parse_block(json!({
            "type": "text",
            "content": {"text": "abc", "entities": [{"type": "bold", "offset": -1, "length": 1}]}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
        assert_eq!(err.field(), "items[0].content.entities[0].type");
    }

    #[test]
    fn test_text_link_entity() {
        let block = parse_block(json!({
            "type": "paragraph",
            "content": {
                "text": "see docs",
                "entities": [{"type": "text_link", "offset": 4, "length": 4, "url": "https://docs.rs"}]
            }
        }))
        .unwrap();
        assert_eq!(
            block.rich_texts()[0].entities,
            vec![TextEntity::text_link(4, 4, "https://docs.rs")]
        );
    }

    #[test]
    fn test_url_must_be_string_when_present() {
        let err = parse_block(json!({
            "type": "text",
            "content": {"text": "a", "entities": [{"type": "url", "offset": 0, "length": 1, "url": 7}]}
        }))
        .unwrap_err();
        assert_eq!(err.field(), "items[0].content.entities[0].url");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let order = parse(json!({
            "chat_id": 1,
            "version": 3,
            "items": [{"type": "text", "content": {"text": "a", "style": "bold"}, "id": "x"}]
        }))
        .unwrap();
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_entity_permissive_by_default() {
        // offset + length past the end of the text is not checked unless asked for
        let raw = json!({
            "chat_id": 1,
            "items": [{
                "type": "text",
                "content": {"text": "abc", "entities": [{"type": "url", "offset": 2, "length": 10}]}
            }]
        });
        assert!(parse(raw.clone()).is_ok());

        let err = Parser::new(ParseOptions::strict()).order(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(err.field(), "items[0].content.entities[0]");
    }

    #[test]
    fn test_strict_bounds_counts_utf16_units() {
        // "😀" is two UTF-16 code units
        let raw = json!({
            "chat_id": 1,
            "items": [{
                "type": "text",
                "content": {"text": "😀", "entities": [{"type": "url", "offset": 0, "length": 2}]}
            }]
        });
        assert!(Parser::new(ParseOptions::strict()).order(&raw).is_ok());
    }

    #[test]
    fn test_document_reference() {
        let parser = Parser::new(ParseOptions::default());
        let doc = parser
            .document_reference(&json!({
                "chat_id": 5,
                "filename": "order.pdf",
                "storage_key": "documents/2025/11/20/x.pdf"
            }))
            .unwrap();
        assert_eq!(doc.filename, "order.pdf");

        let err = parser
            .document_reference(&json!({"chat_id": 5, "filename": "order.pdf"}))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "storage_key".to_string()
            }
        );

        let err = parser
            .document_reference(&json!({"chat_id": 5, "filename": 1, "storage_key": "k"}))
            .unwrap_err();
        assert_eq!(err.field(), "filename");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_parser_owns_its_options() {
        let raw = json!({
            "chat_id": 1,
            "items": [{
                "type": "text",
                "content": {"text": "ab", "entities": [{"type": "url", "offset": 1, "length": 5}]}
            }]
        });

        let parser = Parser::new(ParseOptions::strict());
        let copied = parser;
        assert!(parser.order(&raw).is_err());
        assert!(copied.order(&raw).is_err());
        assert!(Parser::default().order(&raw).is_ok());
    }

    #[test]
    fn test_variant_tables_match_wire_names() {
        let blocks: Vec<&str> = BLOCK_VARIANTS.iter().map(|(name, _)| *name).collect();
        assert_eq!(blocks, Block::KINDS);

        let entities: Vec<&str> = ENTITY_VARIANTS.iter().map(|(name, _)| *name).collect();
        assert_eq!(entities, TextEntityType::ALL);
        for (name, kind) in ENTITY_VARIANTS {
            assert_eq!(kind.as_str(), *name);
        }
    }
}
