//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data. Text is encoded into
//! the builder's code page as it is written, so the buffer always holds the
//! exact bytes sent to the printer.

use crate::encoding::{CodePage, encode_text, text_width_in};

/// ESC @ - Initialize printer
pub const INIT: [u8; 2] = [0x1B, 0x40];
/// ESC a 0 - Left alignment
pub const ALIGN_LEFT: [u8; 3] = [0x1B, 0x61, 0x00];
/// ESC a 1 - Center alignment
pub const ALIGN_CENTER: [u8; 3] = [0x1B, 0x61, 0x01];
/// GS V 0 - Full cut
pub const CUT_FULL: [u8; 3] = [0x1D, 0x56, 0x00];

/// ESC/POS command builder
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
    code_page: CodePage,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// The buffer starts with the initialize command (`ESC @`).
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(&INIT);
        Self {
            buf,
            width,
            code_page: CodePage::default(),
        }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    // === Character Table ===

    /// Select an 8-bit character table (ESC t n); later text is encoded with it
    pub fn code_page(&mut self, page: CodePage) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x74, page.table()]);
        self.code_page = page;
        self
    }

    // === Text Output ===

    /// Write text encoded in the active code page
    pub fn text(&mut self, s: &str) -> &mut Self {
        let encoded = encode_text(s, self.code_page);
        self.buf.extend_from_slice(&encoded);
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines (ESC d n)
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&ALIGN_CENTER);
        self
    }

    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&ALIGN_LEFT);
        self
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = text_width_in(left, self.code_page);
        let rw = text_width_in(right, self.code_page);

        if lw + rw >= self.width {
            self.text(left);
            self.text(" ");
            self.line(right);
        } else {
            let spaces = self.width - lw - rw;
            self.text(left);
            self.text(&" ".repeat(spaces));
            self.line(right);
        }
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&CUT_FULL);
        self
    }

    /// Full cut after feeding n lines (GS V 66 n)
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    /// Sound the built-in buzzer `times` times, `duration` x 50ms each (ESC B n t)
    pub fn buzzer(&mut self, times: u8, duration: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x42, times, duration]);
        self
    }

    // === Build ===

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Byte sequence for one receipt over a direct channel
///
/// `ESC @`, `ESC t n`, `ESC a 1`, encoded text, `ESC a 0`, `GS V 0`.
/// The formatter already appends the paper-feed lines, so the cut follows the
/// text directly.
pub fn receipt_job(text: &str, page: CodePage) -> Vec<u8> {
    let mut b = EscPosBuilder::new(0);
    b.code_page(page).center().text(text).left().cut();
    b.build()
}
