//! # receipt-station
//!
//! Checkout-side receipt printing: formats a cart into fixed-width bilingual
//! text and hands it to whichever printer transport this machine has.
//!
//! - [`formatter`] - column policy and text rendering
//! - [`dispatch`] - direct channel with network-service fallback
//! - [`config`] / [`logger`] - environment and tracing setup for the binary

pub mod config;
pub mod dispatch;
pub mod formatter;
pub mod input;
pub mod logger;

pub use config::Config;
pub use dispatch::{Delivery, PrintDispatcher, PrintOutcome, PrintState};
pub use formatter::{ReceiptFormatter, format};
pub use input::{FormatArgsError, load_request};
