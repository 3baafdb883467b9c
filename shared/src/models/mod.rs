//! Receipt models
//!
//! - [`cart`]: line items and the receipt request handed to the formatter
//! - [`layout`]: paper widths, verbosity presets and transport targets

pub mod cart;
pub mod layout;

pub use cart::{CashierInfo, LineItem, PaymentMethod, ReceiptRequest, ReceiptTitle};
pub use layout::{
    CurrencyLabels, LayoutProfile, MAX_COPIES, PaperWidth, TransportTarget, Verbosity, WidthBand,
};
