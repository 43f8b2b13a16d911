//! Helpers for inline text entities.
//!
//! Entity offsets and lengths count UTF-16 code units, which is how the chat
//! platform reports them. Rust strings are UTF-8, so every conversion between
//! the two goes through here.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{RichText, TextEntity, TextEntityType};

lazy_static! {
    /// Bare http(s) link in running text
    static ref URL_PATTERN: Regex = Regex::new(r#"https?://[^\s<>"']+"#).unwrap();
}

/// Characters that end a sentence rather than a link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> u64 {
    text.encode_utf16().count() as u64
}

fn trim_link(link: &str) -> &str {
    let mut link = link.trim_end_matches(TRAILING_PUNCTUATION);
    // A closing paren only belongs to the link if it opened one
    while link.ends_with(')') && link.matches('(').count() < link.matches(')').count() {
        link = link[..link.len() - 1].trim_end_matches(TRAILING_PUNCTUATION);
    }
    link
}

/// Find bare links in `text` and describe them as `url` entities.
pub fn detect_urls(text: &str) -> Vec<TextEntity> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| {
            let link = trim_link(m.as_str());
            TextEntity::url(utf16_len(&text[..m.start()]), utf16_len(link))
        })
        .collect()
}

impl RichText {
    /// Plain text with its bare links annotated.
    pub fn with_detected_urls(text: impl Into<String>) -> Self {
        let text = text.into();
        let entities = detect_urls(&text);
        Self { text, entities }
    }

    /// Text covered by `entity`, or `None` if the span is out of bounds or
    /// splits a surrogate pair.
    pub fn entity_text(&self, entity: &TextEntity) -> Option<String> {
        let units: Vec<u16> = self.text.encode_utf16().collect();
        let start = usize::try_from(entity.offset).ok()?;
        let end = usize::try_from(entity.end()).ok()?;
        let span = units.get(start..end)?;
        String::from_utf16(span).ok()
    }

    /// Indices of entities whose span runs past the end of the text.
    pub fn out_of_bounds_entities(&self) -> Vec<usize> {
        let len = utf16_len(&self.text);
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.end() > len)
            .map(|(i, _)| i)
            .collect()
    }
}

impl TextEntity {
    /// Where this entity links to.
    ///
    /// Text links carry their own `url`; bare links point at the text they
    /// cover.
    pub fn target(&self, text: &RichText) -> Option<String> {
        match self.kind {
            TextEntityType::TextLink => self.url.clone(),
            TextEntityType::Url => text.entity_text(self),
        }
    }
}
