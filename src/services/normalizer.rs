//! Message text normalization for classification.
//!
//! Produces the single text input the classifier sees for a message:
//! - The plain text body wins whenever it has non-whitespace content
//! - Otherwise the HTML body is used with tags stripped
//! - The selected text is capped to a fixed character budget

use regex::Regex;

use crate::domain::Email;

/// Maximum number of characters passed to the classifier.
///
/// Long emails are cut here rather than rejected so oversized messages
/// still get classified on their opening text.
pub const MAX_CLASSIFIED_CHARS: usize = 2000;

/// Normalizes message bodies into classifier input.
pub struct TextNormalizer {
    tag_re: Regex,
}

impl TextNormalizer {
    /// Creates a new normalizer.
    pub fn new() -> Self {
        Self {
            // Strips anything tag-shaped; text between tags is left as-is,
            // with no separator inserted where a tag was removed.
            tag_re: Regex::new(r"<[^>]*>").unwrap(),
        }
    }

    /// Produces the classification input for a message.
    ///
    /// Returns an empty string when the message has no usable body, which
    /// downstream treats as neutral rather than an error.
    pub fn normalize(&self, email: &Email) -> String {
        let text = match &email.body_text {
            Some(plain) if !plain.trim().is_empty() => plain.clone(),
            _ => email
                .body_html
                .as_deref()
                .map(|html| self.strip_tags(html))
                .unwrap_or_default(),
        };

        text.chars().take(MAX_CLASSIFIED_CHARS).collect()
    }

    /// Removes HTML tags, keeping the text content.
    fn strip_tags(&self, html: &str) -> String {
        self.tag_re.replace_all(html, "").into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
