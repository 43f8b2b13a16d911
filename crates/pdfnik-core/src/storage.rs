//! Storage key conventions.
//!
//! Keys are opaque to the contract: parsing never inspects them. Producers
//! that upload assets use these helpers so keys stay laid out as
//! `<prefix>/YYYY/MM/DD/<id>.<ext>`.

use chrono::{Datelike, NaiveDate, Utc};

/// Prefix for images uploaded from chat messages.
pub const IMAGES_PREFIX: &str = "images";

/// Prefix for rendered output documents.
pub const DOCUMENTS_PREFIX: &str = "documents";

/// Build a date-partitioned key.
///
/// The extension is lower-cased and may be given with or without a leading dot.
pub fn dated_key(prefix: &str, date: NaiveDate, id: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.').to_lowercase();
    let prefix = prefix.trim_end_matches('/');
    let base = format!(
        "{}/{:04}/{:02}/{:02}/{}",
        prefix,
        date.year(),
        date.month(),
        date.day(),
        id
    );

    if extension.is_empty() {
        base
    } else {
        format!("{}.{}", base, extension)
    }
}

/// Key for an uploaded image, e.g. `images/2025/11/20/<id>.jpg`.
pub fn image_key(date: NaiveDate, id: &str, extension: &str) -> String {
    dated_key(IMAGES_PREFIX, date, id, extension)
}

/// Key for a rendered document, e.g. `documents/2025/11/20/<id>.pdf`.
pub fn document_key(date: NaiveDate, id: &str, extension: &str) -> String {
    dated_key(DOCUMENTS_PREFIX, date, id, extension)
}

/// [`image_key`] for today's UTC date.
pub fn image_key_today(id: &str, extension: &str) -> String {
    image_key(Utc::now().date_naive(), id, extension)
}
