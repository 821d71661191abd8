//! Title extraction from untrusted, possibly truncated HTML.

use std::borrow::Cow;

use linkherald_channels::sanitize_text;

use crate::policy::TitlePattern;

/// Pull a displayable title out of `body`.
///
/// Returns `None` when the pattern does not match or the title is empty
/// once decoded, trimmed and sanitized.
pub fn extract_title(body: &[u8], pattern: TitlePattern, char_limit: usize) -> Option<String> {
    let caps = pattern.regex().captures(body)?;
    let raw = String::from_utf8_lossy(caps.get(1)?.as_bytes());
    let title = sanitize_text(decode_entities(&raw).trim(), char_limit);
    (!title.is_empty()).then_some(title)
}

/// Decode HTML5 named and numeric character references.
///
/// Unknown or malformed references are left untouched.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(input)
}
