//! Fixed-width text cells
//!
//! Widths are printer cells in the Windows-1256 table (see
//! [`receipt_printer::encoding`]), not chars or bytes of the UTF-8 string.

use receipt_printer::{pad_width, text_width, truncate_width};
use rust_decimal::{Decimal, RoundingStrategy};

/// Marker appended to truncated item names
pub const TRUNCATION_MARKER: &str = "..";

/// Fit `s` into `width` cells, marking the cut with [`TRUNCATION_MARKER`]
pub fn truncate_with_marker(s: &str, width: usize) -> String {
    if text_width(s) <= width {
        return s.to_string();
    }
    let marker_width = text_width(TRUNCATION_MARKER);
    if width <= marker_width {
        return truncate_width(TRUNCATION_MARKER, width);
    }
    let mut cut = truncate_width(s, width - marker_width);
    cut.push_str(TRUNCATION_MARKER);
    cut
}

/// Control characters (tabs, newlines) become spaces
///
/// They take no cell when measured but move the print head, so caller text is
/// cleaned before it is laid out.
pub fn printable(s: &str) -> String {
    s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect()
}

/// Right-align within `width` cells
pub fn pad_left(s: &str, width: usize) -> String {
    pad_width(s, width, true)
}

/// Left-align within `width` cells
pub fn pad_right(s: &str, width: usize) -> String {
    pad_width(s, width, false)
}

/// Center within `width` cells; an odd remainder puts the extra space on the left
pub fn center(s: &str, width: usize) -> String {
    let s = truncate_width(s, width);
    let spaces = width - text_width(&s);
    let right = spaces / 2;
    let left = spaces - right;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

/// Label zone of a key/value line, 60% of the budget
pub const fn label_zone(budget: usize) -> usize {
    budget * 60 / 100
}

/// Label left, value right-aligned, exactly `budget` cells
///
/// When both do not fit, the value is cut to its zone first and the label then
/// gets whatever remains.
pub fn key_value(label: &str, value: &str, budget: usize) -> String {
    let value = if text_width(label) + text_width(value) > budget {
        truncate_width(value, budget - label_zone(budget))
    } else {
        value.to_string()
    };
    let value_width = text_width(&value);
    let label = truncate_width(label, budget - value_width);
    let spaces = budget - text_width(&label) - value_width;
    format!("{}{}{}", label, " ".repeat(spaces), value)
}

/// Two-decimal money string, half away from zero
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Plain-text line builder with a fixed column budget
pub struct TextBuilder {
    buf: String,
    width: usize,
}

impl TextBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::with_capacity(width * 40),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Write a line, cut to the column budget
    pub fn write_line(&mut self, s: &str) {
        self.buf.push_str(&truncate_width(s, self.width));
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    // --- Separators ---
    pub fn eq_sep(&mut self) {
        self.write_line(&"=".repeat(self.width));
    }
    pub fn dash_sep(&mut self) {
        self.write_line(&"-".repeat(self.width));
    }

    // --- Layout Helpers ---

    pub fn center(&mut self, s: &str) {
        let line = center(&printable(s), self.width);
        self.write_line(line.trim_end());
    }

    /// Left text and right text on one line, right side flush to the edge
    ///
    /// The right side is kept whole; the left side gives way.
    pub fn line_lr(&mut self, left: &str, right: &str) {
        let right = truncate_width(right, self.width);
        let room = self.width - text_width(&right);
        let left = truncate_width(left, room.saturating_sub(1));
        let spaces = room - text_width(&left);
        self.write_line(&format!("{}{}{}", left, " ".repeat(spaces), right));
    }

    pub fn key_value(&mut self, label: &str, value: &str) {
        let line = key_value(&printable(label), &printable(value), self.width);
        self.write_line(&line);
    }

    pub fn finalize(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_truncate_marker() {
        assert_eq!(truncate_with_marker("Espresso", 10), "Espresso");
        assert_eq!(truncate_with_marker("Cappuccino grande", 10), "Cappucci..");
        assert_eq!(text_width(&truncate_with_marker("عصير برتقال طازج كبير", 10)), 10);
        assert!(truncate_with_marker("عصير برتقال طازج كبير", 10).ends_with(".."));
    }

    #[test]
    fn test_exact_fit_has_no_marker() {
        assert_eq!(truncate_with_marker("0123456789", 10), "0123456789");
    }

    #[test]
    fn test_center_odd_remainder_left() {
        assert_eq!(center("ab", 5), "  ab ");
        assert_eq!(center("abc", 5), " abc ");
        assert_eq!(center("toolong", 3), "too");
    }

    #[test]
    fn test_key_value_fills_budget() {
        let line = key_value("Invoice", "INV-1", 30);
        assert_eq!(text_width(&line), 30);
        assert!(line.starts_with("Invoice"));
        assert!(line.ends_with("INV-1"));
    }

    #[test]
    fn test_key_value_truncates_value_first() {
        // budget 24: label zone 14, value zone 10
        let line = key_value("رقم الفاتورة", "INV-12345678-042", 24);
        assert_eq!(text_width(&line), 24);
        assert!(line.starts_with("رقم الفاتورة"));
        assert!(line.ends_with("INV-123456"));
    }

    #[test]
    fn test_control_characters_become_spaces() {
        assert_eq!(printable("Tea\twith\nmint"), "Tea with mint");

        let mut b = TextBuilder::new(20);
        b.key_value("Cashier", "Sara\nAhmed");
        b.center("Thank\tyou");
        let out = b.finalize();
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("Cashier   Sara Ahmed\n"));
        assert!(!out.contains('\t'));
    }

    #[test]
    fn test_money_two_decimals() {
        assert_eq!(money(Decimal::from(5)), "5.00");
        assert_eq!(money(Decimal::from_str("5.5").unwrap()), "5.50");
        assert_eq!(money(Decimal::from_str("2.345").unwrap()), "2.35");
        assert_eq!(money(Decimal::from_str("-2.345").unwrap()), "-2.35");
    }

    #[test]
    fn test_line_lr_right_flush() {
        let mut b = TextBuilder::new(20);
        b.line_lr("Subtotal", "19.00");
        let out = b.finalize();
        assert_eq!(out, format!("Subtotal{}19.00\n", " ".repeat(7)));
    }
}
