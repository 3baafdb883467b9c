//! # receipt-printer
//!
//! Thermal printer plumbing for receipts - low-level output only.
//!
//! ## Scope
//!
//! This crate handles HOW a receipt leaves the machine:
//! - ESC/POS command building
//! - Windows-1256 encoding and cell widths for Arabic/Latin text
//! - Direct byte channels (serial 9600 8N1, raw TCP port 9100)
//! - The local network print service (`POST /print`)
//! - The print confirmation tone
//!
//! WHAT goes on the paper (column layout, totals, footer) lives in
//! `receipt-station`.
//!
//! ## Example
//!
//! ```ignore
//! use receipt_printer::{receipt_job, CodePage, DirectChannel, SerialChannel};
//!
//! let job = receipt_job("فاتورة مبيعات\nTOTAL 19.00 SAR\n", CodePage::Wpc1256);
//!
//! let channel = SerialChannel::new("/dev/ttyUSB0");
//! channel.send(&job).await?;
//! ```

pub mod encoding;
mod error;
pub mod escpos;
mod printer;
mod service;
pub mod tone;

// Re-exports
pub use encoding::{CodePage, encode_text, pad_width, text_width, truncate_width};
pub use error::{PrintError, PrintResult, TransportError};
pub use escpos::{EscPosBuilder, receipt_job};
pub use printer::{DEFAULT_BAUD_RATE, DirectChannel, RAW_PRINT_PORT, SerialChannel, TcpChannel};
pub use service::NetworkPrintService;
pub use tone::{
    AudioError, ConfirmationTone, NullSink, TONE_SAMPLE_RATE, TerminalBell, ToneSink,
    play_confirmation_tone,
};
