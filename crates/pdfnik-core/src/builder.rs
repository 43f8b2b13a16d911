//! Fluent construction of orders in memory.

use crate::types::{
    Block, HeadingBlock, ImageBlock, ImageRef, ListBlock, Order, ParagraphBlock, PriceRow,
    PriceTableBlock, RichText, TextBlock,
};

/// Builder for [`Order`] values, appending blocks in document order.
///
/// ```rust
/// use pdfnik_core::{ImageRef, OrderBuilder, PriceRow};
///
/// let order = OrderBuilder::new(42)
///     .heading("Lunch")
///     .price_table(vec![PriceRow::new("Soup", "4.50")])
///     .image(ImageRef::new("soup.jpg", "images/2025/11/20/a.jpg"), None)
///     .build();
///
/// assert_eq!(order.items.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    chat_id: i64,
    items: Vec<Block>,
}

impl OrderBuilder {
    /// Start an order for a chat.
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            items: Vec::new(),
        }
    }

    /// Append an arbitrary block.
    pub fn block(mut self, block: Block) -> Self {
        self.items.push(block);
        self
    }

    pub fn text(self, content: impl Into<RichText>) -> Self {
        self.block(Block::Text(TextBlock {
            content: content.into(),
        }))
    }

    pub fn paragraph(self, content: impl Into<RichText>) -> Self {
        self.block(Block::Paragraph(ParagraphBlock {
            content: content.into(),
        }))
    }

    pub fn heading(self, content: impl Into<RichText>) -> Self {
        self.block(Block::Heading(HeadingBlock {
            content: content.into(),
        }))
    }

    /// Append a list with default bullet, indent and spacing.
    pub fn list<I, T>(self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RichText>,
    {
        self.block(Block::List(ListBlock::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    pub fn price_table(self, rows: Vec<PriceRow>) -> Self {
        self.block(Block::PriceTable(PriceTableBlock { rows }))
    }

    pub fn image(self, image: ImageRef, caption: Option<RichText>) -> Self {
        self.block(Block::Image(ImageBlock { image, caption }))
    }

    /// Build the order.
    pub fn build(self) -> Order {
        Order {
            chat_id: self.chat_id,
            items: self.items,
        }
    }
}
