// receipt-station/tests/formatter_props.rs
// Generated-cart properties of formatted receipts

use proptest::prelude::*;
use receipt_printer::text_width;
use receipt_station::format;
use rust_decimal::Decimal;
use shared::{LayoutProfile, LineItem, PaperWidth, ReceiptRequest, Verbosity};

fn request(paper: PaperWidth, verbosity: Verbosity, items: Vec<LineItem>) -> ReceiptRequest {
    let total = items.iter().map(LineItem::extension).sum();
    ReceiptRequest::new(items, total, LayoutProfile::new(paper.millimeters(), verbosity))
}

fn build_items(rows: Vec<(String, i64, u32)>) -> Vec<LineItem> {
    rows.into_iter()
        .enumerate()
        .map(|(i, (name, cents, qty))| {
            LineItem::new((i + 1).to_string(), name, Decimal::new(cents, 2), qty)
        })
        .collect()
}

/// Lines between the dash rule under the item header and the next dash rule
fn item_block(out: &str) -> Vec<&str> {
    let is_rule = |l: &str| !l.is_empty() && l.chars().all(|c| c == '-');
    out.lines()
        .skip_while(|l| !l.starts_with("الصنف Item"))
        .skip(2)
        .take_while(|l| !is_rule(l))
        .collect()
}

fn plain_name() -> impl Strategy<Value = String> {
    prop_oneof!["[a-zA-Z ]{1,30}", "[ا-ي ]{1,20}"]
}

fn any_name() -> impl Strategy<Value = String> {
    prop_oneof!["[a-zA-Z0-9 .\t\n]{0,40}", "[ا-ي0-9 ]{0,40}"]
}

proptest! {
    #[test]
    fn every_line_fits_the_column_budget(
        rows in prop::collection::vec(
            (any_name(), 0i64..=10_000_000_000, 1u32..=100_000),
            0..=8,
        ),
    ) {
        let items = build_items(rows);
        for paper in PaperWidth::ALL {
            for verbosity in Verbosity::ALL {
                let out = format(&request(paper, verbosity, items.clone()));
                for line in out.lines() {
                    prop_assert!(
                        text_width(line) <= paper.columns(),
                        "{} {}: {:?}",
                        paper,
                        verbosity,
                        line
                    );
                }
            }
        }
    }

    #[test]
    fn rendered_extensions_sum_to_rendered_total(
        rows in prop::collection::vec((plain_name(), 0i64..=999_999, 1u32..=99), 0..=12),
        paper_idx in 0usize..3,
        verbosity_idx in 0usize..3,
    ) {
        let paper = PaperWidth::ALL[paper_idx];
        let verbosity = Verbosity::ALL[verbosity_idx];
        let req = request(paper, verbosity, build_items(rows));
        let out = format(&req);

        let block = item_block(&out);
        prop_assert_eq!(block.len(), req.line_items.len());

        let rendered: Decimal = block
            .iter()
            .filter_map(|l| l.split_whitespace().last())
            .filter_map(|t| t.parse::<Decimal>().ok())
            .sum();
        let expected = format!("TOTAL {:.2} SAR", rendered);
        prop_assert!(out.contains(&expected), "{} not in {}", expected, out);
    }
}
