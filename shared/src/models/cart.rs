//! Cart and receipt request models

use chrono::{DateTime, Local};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::layout::LayoutProfile;

/// One cart line as supplied by the point-of-sale screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Line extension (quantity × unit price)
    pub fn extension(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cashier block printed under the header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashierInfo {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub show: bool,
}

/// Payment method line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    /// (Arabic, English) labels
    pub const fn labels(self) -> (&'static str, &'static str) {
        match self {
            PaymentMethod::Cash => ("نقداً", "Cash"),
            PaymentMethod::Card => ("بطاقة", "Card"),
            PaymentMethod::Transfer => ("تحويل", "Transfer"),
        }
    }
}

/// Bilingual document title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptTitle {
    pub arabic: String,
    pub english: String,
}

impl Default for ReceiptTitle {
    fn default() -> Self {
        Self {
            arabic: "فاتورة مبيعات".to_string(),
            english: "SALES RECEIPT".to_string(),
        }
    }
}

/// Everything the formatter needs for one print action
///
/// `total` is supplied by the caller and printed as-is; the formatter never
/// re-derives it from the line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub cashier: Option<CashierInfo>,
    #[serde(default)]
    pub layout: LayoutProfile,
    #[serde(default = "generate_invoice_number")]
    pub invoice_number: String,
    #[serde(default = "Local::now")]
    pub issued_at: DateTime<Local>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub title: ReceiptTitle,
}

impl ReceiptRequest {
    pub fn new(line_items: Vec<LineItem>, total: Decimal, layout: LayoutProfile) -> Self {
        let issued_at = Local::now();
        Self {
            line_items,
            total,
            cashier: None,
            layout,
            invoice_number: invoice_number_at(issued_at),
            issued_at,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            payment_method: PaymentMethod::default(),
            title: ReceiptTitle::default(),
        }
    }

    pub fn with_cashier(mut self, cashier: CashierInfo) -> Self {
        self.cashier = Some(cashier);
        self
    }

    pub fn with_invoice_number(mut self, invoice_number: impl Into<String>) -> Self {
        self.invoice_number = invoice_number.into();
        self
    }

    pub fn with_issued_at(mut self, issued_at: DateTime<Local>) -> Self {
        self.issued_at = issued_at;
        self
    }

    pub fn with_tax(mut self, tax: Decimal) -> Self {
        self.tax = tax;
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    pub fn with_title(mut self, title: ReceiptTitle) -> Self {
        self.title = title;
        self
    }

    /// Sum of line extensions
    pub fn items_subtotal(&self) -> Decimal {
        self.line_items.iter().map(LineItem::extension).sum()
    }

    /// Cashier block, if the caller asked for it to be printed
    pub fn visible_cashier(&self) -> Option<&CashierInfo> {
        self.cashier.as_ref().filter(|c| c.show)
    }
}

fn generate_invoice_number() -> String {
    invoice_number_at(Local::now())
}

/// `INV-` + last 8 digits of the millisecond timestamp + 3-digit random suffix
fn invoice_number_at(at: DateTime<Local>) -> String {
    let millis = at.timestamp_millis().rem_euclid(100_000_000);
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("INV-{:08}-{:03}", millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extension() {
        let item = LineItem::new("1", "عصير برتقال", dec("5.50"), 2);
        assert_eq!(item.extension(), dec("11.00"));
    }

    #[test]
    fn test_subtotal_sums_extensions() {
        let req = ReceiptRequest::new(
            vec![
                LineItem::new("1", "عصير برتقال", dec("5.50"), 2),
                LineItem::new("2", "قهوة", dec("8"), 1),
            ],
            dec("19"),
            LayoutProfile::default(),
        );
        assert_eq!(req.items_subtotal(), dec("19.00"));
    }

    #[test]
    fn test_invoice_number_shape() {
        let req = ReceiptRequest::new(vec![], Decimal::ZERO, LayoutProfile::default());
        let parts: Vec<&str> = req.invoice_number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "INV");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 3);
    }

    #[test]
    fn test_hidden_cashier_is_not_visible() {
        let cashier = CashierInfo {
            name: "سارة".to_string(),
            show: false,
            ..CashierInfo::default()
        };
        let req = ReceiptRequest::new(vec![], Decimal::ZERO, LayoutProfile::default())
            .with_cashier(cashier);
        assert!(req.visible_cashier().is_none());
    }

    #[test]
    fn test_request_from_cart_json() {
        let json = r#"{
            "lineItems": [
                {"id": "a1", "name": "قهوة", "price": 8.0, "quantity": 1}
            ],
            "total": 8.0,
            "paymentMethod": "card"
        }"#;
        let req: ReceiptRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.line_items.len(), 1);
        assert_eq!(req.total, dec("8"));
        assert_eq!(req.payment_method, PaymentMethod::Card);
        assert!(req.invoice_number.starts_with("INV-"));
        assert_eq!(req.tax, Decimal::ZERO);
    }
}
