//! Persisted printer and cashier settings
//!
//! Both objects live as JSON strings in a [`KeyValueStore`] under
//! [`PRINTER_SETTINGS_KEY`] and [`USER_SETTINGS_KEY`]. Every field has a default,
//! so partially written objects load fine; objects that fail to parse fall back
//! to defaults with a warning instead of blocking a print.

use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{SettingsError, SettingsResult};
use crate::models::{CashierInfo, LayoutProfile, TransportTarget, Verbosity};
use crate::store::KeyValueStore;

pub const PRINTER_SETTINGS_KEY: &str = "printerSettings";
pub const USER_SETTINGS_KEY: &str = "userSettings";

/// Which printer the station prints to by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterKind {
    /// Thermal printer behind the local network print service
    #[default]
    Thermal,
    /// Thermal printer on a locally attached serial port
    Serial,
    /// Anything else (OS print dialog); treated like `Thermal` for delivery
    #[serde(other)]
    System,
}

/// Printer settings object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrinterSettings {
    pub default_printer: PrinterKind,
    #[serde(rename = "thermalPrinterIP")]
    pub thermal_printer_ip: String,
    #[serde(deserialize_with = "lenient_number")]
    pub thermal_printer_port: u16,
    pub auto_print: bool,
    #[serde(deserialize_with = "lenient_number")]
    pub receipt_width: u32,
    pub receipt_format: Verbosity,
    #[serde(deserialize_with = "lenient_number")]
    pub print_copies: u32,
    pub enable_sound: bool,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            default_printer: PrinterKind::Thermal,
            thermal_printer_ip: "192.168.1.100".to_string(),
            thermal_printer_port: 9100,
            auto_print: false,
            receipt_width: 58,
            receipt_format: Verbosity::Standard,
            print_copies: 1,
            enable_sound: true,
        }
    }
}

impl PrinterSettings {
    /// Load from the store, falling back to defaults when absent or malformed
    pub fn load(store: &dyn KeyValueStore) -> SettingsResult<Self> {
        load_or_default(store, PRINTER_SETTINGS_KEY)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> SettingsResult<()> {
        save_json(store, PRINTER_SETTINGS_KEY, self)
    }

    /// Layout profile for the formatter and dispatcher
    pub fn to_layout_profile(&self) -> LayoutProfile {
        let transport = match self.default_printer {
            PrinterKind::Serial => TransportTarget::DirectChannel,
            PrinterKind::Thermal | PrinterKind::System => TransportTarget::NetworkService {
                host: self.thermal_printer_ip.clone(),
                port: self.thermal_printer_port,
            },
        };
        LayoutProfile::new(self.receipt_width, self.receipt_format)
            .with_copies(self.print_copies)
            .with_sound(self.enable_sound)
            .with_transport(transport)
    }
}

/// Cashier settings object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub user_name: String,
    pub user_phone: String,
    pub user_email: String,
    pub user_position: String,
    pub show_user_info_on_receipt: bool,
}

impl UserSettings {
    pub fn load(store: &dyn KeyValueStore) -> SettingsResult<Self> {
        load_or_default(store, USER_SETTINGS_KEY)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> SettingsResult<()> {
        save_json(store, USER_SETTINGS_KEY, self)
    }

    /// Cashier block, `None` when no cashier name is configured
    pub fn to_cashier_info(&self) -> Option<CashierInfo> {
        let name = self.user_name.trim();
        if name.is_empty() {
            return None;
        }
        Some(CashierInfo {
            name: name.to_string(),
            phone: non_empty(&self.user_phone),
            email: non_empty(&self.user_email),
            position: non_empty(&self.user_position),
            show: self.show_user_info_on_receipt,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> SettingsResult<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key = key, error = %e, "malformed settings, using defaults");
            Ok(T::default())
        }
    }
}

fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> SettingsResult<()> {
    let json = serde_json::to_string(value).map_err(|e| SettingsError::Json {
        key: key.to_string(),
        source: e,
    })?;
    store.set(key, &json)
}

/// Accept numbers stored either as JSON numbers or as strings ("9100")
fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("number out of range: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<T>()
            .map_err(|_| de::Error::custom(format!("not a number: {:?}", s))),
        other => Err(de::Error::custom(format!("expected a number, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperWidth;
    use crate::store::MemoryStore;

    #[test]
    fn test_defaults_when_absent() {
        let store = MemoryStore::new();
        let printer = PrinterSettings::load(&store).unwrap();
        assert_eq!(printer, PrinterSettings::default());
        let user = UserSettings::load(&store).unwrap();
        assert!(user.to_cashier_info().is_none());
    }

    #[test]
    fn test_string_numbers_accepted() {
        let store = MemoryStore::new();
        store
            .set(
                PRINTER_SETTINGS_KEY,
                r#"{"thermalPrinterIP":"10.0.0.7","thermalPrinterPort":"9200","receiptWidth":"80","printCopies":2,"receiptFormat":"detailed"}"#,
            )
            .unwrap();
        let settings = PrinterSettings::load(&store).unwrap();
        assert_eq!(settings.thermal_printer_ip, "10.0.0.7");
        assert_eq!(settings.thermal_printer_port, 9200);
        assert_eq!(settings.receipt_width, 80);
        assert_eq!(settings.print_copies, 2);
        assert!(settings.enable_sound);

        let profile = settings.to_layout_profile();
        assert_eq!(profile.paper_width(), PaperWidth::Mm80);
        assert_eq!(profile.verbosity, Verbosity::Detailed);
        assert_eq!(
            profile.transport,
            TransportTarget::NetworkService {
                host: "10.0.0.7".to_string(),
                port: 9200
            }
        );
    }

    #[test]
    fn test_malformed_falls_back_to_defaults() {
        let store = MemoryStore::new();
        store.set(PRINTER_SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(PrinterSettings::load(&store).unwrap(), PrinterSettings::default());
    }

    #[test]
    fn test_serial_printer_targets_direct_channel() {
        let settings = PrinterSettings {
            default_printer: PrinterKind::Serial,
            ..PrinterSettings::default()
        };
        assert_eq!(settings.to_layout_profile().transport, TransportTarget::DirectChannel);
    }

    #[test]
    fn test_unknown_printer_kind_is_system() {
        let settings: PrinterSettings =
            serde_json::from_str(r#"{"defaultPrinter":"browser"}"#).unwrap();
        assert_eq!(settings.default_printer, PrinterKind::System);
    }

    #[test]
    fn test_user_settings_to_cashier() {
        let user = UserSettings {
            user_name: " أحمد ".to_string(),
            user_phone: "0500000000".to_string(),
            user_email: String::new(),
            user_position: "كاشير".to_string(),
            show_user_info_on_receipt: true,
        };
        let cashier = user.to_cashier_info().unwrap();
        assert_eq!(cashier.name, "أحمد");
        assert_eq!(cashier.phone.as_deref(), Some("0500000000"));
        assert!(cashier.email.is_none());
        assert!(cashier.show);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let user = UserSettings {
            user_name: "Omar".to_string(),
            show_user_info_on_receipt: true,
            ..UserSettings::default()
        };
        user.save(&store).unwrap();
        assert_eq!(UserSettings::load(&store).unwrap(), user);
        let raw = store.get(USER_SETTINGS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"showUserInfoOnReceipt\":true"));
    }
}
