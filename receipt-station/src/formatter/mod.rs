//! Receipt formatter
//!
//! Renders a [`ReceiptRequest`] into plain fixed-width text for the thermal
//! roll. Layout only: amounts are not validated and the grand total is the
//! caller's, never recomputed.

pub mod layout;
pub mod text;

use receipt_printer::text_width;
use rust_decimal::Decimal;
use shared::{CashierInfo, LineItem, PaperWidth, ReceiptRequest, Verbosity};
use tracing::debug;

use self::layout::ColumnLayout;
use self::text::{TextBuilder, money, pad_left, pad_right, printable, truncate_with_marker};

/// Render a receipt to text
pub fn format(request: &ReceiptRequest) -> String {
    ReceiptFormatter::new(request).render()
}

pub struct ReceiptFormatter<'a> {
    request: &'a ReceiptRequest,
    paper: PaperWidth,
    verbosity: Verbosity,
    columns: ColumnLayout,
}

impl<'a> ReceiptFormatter<'a> {
    pub fn new(request: &'a ReceiptRequest) -> Self {
        let paper = request.layout.paper_width();
        let verbosity = request.layout.verbosity;
        Self {
            request,
            paper,
            verbosity,
            columns: ColumnLayout::resolve(paper.band(), verbosity),
        }
    }

    pub fn column_budget(&self) -> usize {
        self.paper.columns()
    }

    pub fn render(&self) -> String {
        let mut b = TextBuilder::new(self.column_budget());

        self.render_header(&mut b);
        if let Some(cashier) = self.request.visible_cashier() {
            self.render_cashier(&mut b, cashier);
        }
        self.render_items(&mut b);
        self.render_totals(&mut b);
        self.render_footer(&mut b);

        for _ in 0..self.verbosity.feed_lines() {
            b.blank();
        }

        let out = b.finalize();
        debug!(
            paper = %self.paper,
            verbosity = %self.verbosity,
            items = self.request.line_items.len(),
            lines = out.lines().count(),
            "receipt formatted"
        );
        out
    }

    fn render_header(&self, b: &mut TextBuilder) {
        let title = &self.request.title;
        b.center(&title.arabic);
        b.center(&title.english);
        b.eq_sep();

        let issued_at = self.request.issued_at;
        b.key_value("الفاتورة No.", &self.request.invoice_number);
        b.key_value("التاريخ Date", &issued_at.format("%Y-%m-%d").to_string());
        b.key_value("الوقت Time", &issued_at.format("%H:%M:%S").to_string());
    }

    fn render_cashier(&self, b: &mut TextBuilder, cashier: &CashierInfo) {
        b.dash_sep();
        b.key_value("الكاشير Cashier", &cashier.name);
        if self.verbosity == Verbosity::Compact {
            return;
        }
        if let Some(phone) = &cashier.phone {
            b.key_value("الهاتف Phone", phone);
        }
        if let Some(position) = &cashier.position {
            b.key_value("الوظيفة Role", position);
        }
    }

    fn render_items(&self, b: &mut TextBuilder) {
        let cols = &self.columns;
        b.dash_sep();

        let mut header = vec![
            pad_right("الصنف Item", cols.name),
            pad_left(ColumnLayout::qty_label(self.paper.band()), cols.qty),
        ];
        if let Some(w) = cols.price {
            header.push(pad_left("Price", w));
        }
        header.push(pad_left("Total", cols.total));
        b.write_line(&header.join(" "));
        b.dash_sep();

        for (i, item) in self.request.line_items.iter().enumerate() {
            for line in self.item_rows(i + 1, item) {
                b.write_line(&line);
            }
        }
    }

    /// One item row, or a name line plus an amounts line
    ///
    /// Amounts wider than their column take cells from the name. When even
    /// that leaves no room, the unit price is left out, and as a last resort
    /// the amounts move to their own right-aligned line. Amounts are never cut
    /// while the line total alone fits the budget.
    fn item_rows(&self, seq: usize, item: &LineItem) -> Vec<String> {
        let cols = &self.columns;
        let budget = self.column_budget();
        let prefix = format!("{}.", seq);
        let name = printable(&item.name);
        let qty = item.quantity.to_string();
        let price = cols.price.map(|_| money(item.price));
        let total = money(item.extension());

        let mut tails = vec![amount_cells(
            &qty,
            price.as_deref(),
            &total,
            [cols.qty, cols.price.unwrap_or(0), cols.total],
        )];
        if price.is_some() {
            tails.push(amount_cells(&qty, None, &total, [cols.qty, 0, cols.total]));
        }

        for tail in tails {
            let name_width = budget.checked_sub(text_width(&tail) + 1);
            if let Some(name_width) = name_width.filter(|w| *w >= text_width(&prefix)) {
                let name = truncate_with_marker(&name, name_width - text_width(&prefix));
                let cell = pad_right(&format!("{}{}", prefix, name), name_width);
                return vec![format!("{} {}", cell, tail)];
            }
        }

        let amounts = [
            amount_cells(&qty, price.as_deref(), &total, [0; 3]),
            amount_cells(&qty, None, &total, [0; 3]),
        ]
        .into_iter()
        .find(|line| text_width(line) <= budget)
        .unwrap_or(total);
        let name = truncate_with_marker(&name, budget.saturating_sub(text_width(&prefix)));
        vec![format!("{}{}", prefix, name), pad_left(&amounts, budget)]
    }

    fn render_totals(&self, b: &mut TextBuilder) {
        let req = self.request;
        b.dash_sep();

        if self.verbosity == Verbosity::Detailed {
            let units: u32 = req.line_items.iter().map(|i| i.quantity).sum();
            b.line_lr("عدد القطع Units", &units.to_string());
        }
        b.line_lr("المجموع Subtotal", &money(req.items_subtotal()));
        if req.tax > Decimal::ZERO {
            b.line_lr("الضريبة Tax", &money(req.tax));
        }
        if req.discount > Decimal::ZERO {
            b.line_lr("الخصم Discount", &format!("-{}", money(req.discount)));
        }
        b.eq_sep();

        let currency = &req.layout.currency;
        let total = money(req.total);
        b.center(&format!("الإجمالي {} {}", total, currency.local));
        b.center(&format!("TOTAL {} {}", total, currency.english.to_uppercase()));
        b.eq_sep();
    }

    fn render_footer(&self, b: &mut TextBuilder) {
        let (method_ar, method_en) = self.request.payment_method.labels();
        b.line_lr("الدفع Payment", &format!("{} {}", method_ar, method_en));
        b.blank();

        match self.verbosity {
            Verbosity::Compact => {
                b.center("شكراً Thank you");
            }
            Verbosity::Standard | Verbosity::Detailed => {
                b.center("شكراً لزيارتكم");
                b.center("Thank you for your visit");
            }
        }

        if self.verbosity == Verbosity::Detailed {
            if let Some(cashier) = self.request.visible_cashier() {
                if let Some(phone) = &cashier.phone {
                    b.center(&format!("Tel {}", phone));
                }
                if let Some(email) = &cashier.email {
                    b.center(email);
                }
            }
            b.center(&format!(
                "{} | {} cols | {}",
                self.paper,
                self.column_budget(),
                self.verbosity
            ));
        }
    }
}

/// Quantity, optional unit price and line total, each right-aligned to at
/// least its column width
fn amount_cells(qty: &str, price: Option<&str>, total: &str, widths: [usize; 3]) -> String {
    let cell = |s: &str, w: usize| pad_left(s, w.max(text_width(s)));
    let mut cells = vec![cell(qty, widths[0])];
    if let Some(price) = price {
        cells.push(cell(price, widths[1]));
    }
    cells.push(cell(total, widths[2]));
    cells.join(" ")
}
