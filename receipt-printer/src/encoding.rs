//! Single-byte code page utilities for Arabic/English thermal printers
//!
//! Receipts are printed through an 8-bit character table, so every character
//! the table can represent occupies exactly one printer cell. This module
//! provides utilities for:
//! - Measuring string widths in printer cells
//! - Truncating/padding strings to a cell width
//! - Encoding UTF-8 text into the selected code page

use encoding_rs::Encoding;
use tracing::instrument;

/// 8-bit character tables selectable with `ESC t n`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CodePage {
    /// Windows-1256 (Arabic + ASCII)
    #[default]
    Wpc1256,
    /// Windows-1252 (Western European)
    Wpc1252,
}

impl CodePage {
    /// `n` parameter for `ESC t n`
    pub const fn table(self) -> u8 {
        match self {
            CodePage::Wpc1256 => 50,
            CodePage::Wpc1252 => 16,
        }
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            CodePage::Wpc1256 => encoding_rs::WINDOWS_1256,
            CodePage::Wpc1252 => encoding_rs::WINDOWS_1252,
        }
    }

    /// Encode one character, `None` if the table cannot represent it
    fn encode_char(self, c: char) -> Option<Vec<u8>> {
        let mut utf8 = [0u8; 4];
        let (bytes, _, had_errors) = self.encoding().encode(c.encode_utf8(&mut utf8));
        if had_errors {
            None
        } else {
            Some(bytes.into_owned())
        }
    }
}

/// Printer cells taken by one character
///
/// Control characters take no cell. Characters outside the table print as a
/// substitute glyph and still take one.
pub fn char_width(c: char, page: CodePage) -> usize {
    if c.is_control() {
        return 0;
    }
    page.encode_char(c).map_or(1, |bytes| bytes.len())
}

/// Printer-cell width of a string in the default table
pub fn text_width(s: &str) -> usize {
    text_width_in(s, CodePage::default())
}

/// Printer-cell width of a string in a given table
pub fn text_width_in(s: &str, page: CodePage) -> usize {
    s.chars().map(|c| char_width(c, page)).sum()
}

/// Truncate a string to fit within a cell width
pub fn truncate_width(s: &str, max_width: usize) -> String {
    let page = CodePage::default();
    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = char_width(c, page);
        if width + w > max_width {
            break;
        }
        result.push(c);
        width += w;
    }
    result
}

/// Pad a string to a specific cell width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_width(s: &str, width: usize, align_right: bool) -> String {
    let current_width = text_width(s);
    if current_width >= width {
        return truncate_width(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Encode UTF-8 text into the given table
///
/// ASCII passes through byte-for-byte. Characters the table cannot represent
/// become `?`.
#[instrument(skip(text), fields(chars = text.len()))]
pub fn encode_text(text: &str, page: CodePage) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len());
    let mut replaced = 0usize;
    for c in text.chars() {
        if c.is_ascii() {
            result.push(c as u8);
            continue;
        }
        match page.encode_char(c) {
            Some(bytes) => result.extend_from_slice(&bytes),
            None => {
                replaced += 1;
                result.push(b'?');
            }
        }
    }
    if replaced > 0 {
        tracing::debug!(replaced, ?page, "unmappable characters replaced");
    }
    result
}
