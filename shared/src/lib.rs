//! Shared types for the receipt printing stack
//!
//! Cart and layout models handed to the receipt formatter, plus the persisted
//! printer/user settings and the key-value store they are read from.

pub mod error;
pub mod models;
pub mod settings;
pub mod store;

// Re-exports
pub use error::{SettingsError, SettingsResult};
pub use models::{
    CashierInfo, CurrencyLabels, LayoutProfile, LineItem, MAX_COPIES, PaperWidth, PaymentMethod,
    ReceiptRequest, ReceiptTitle, TransportTarget, Verbosity, WidthBand,
};
pub use rust_decimal::Decimal;
pub use settings::{PrinterSettings, UserSettings};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
