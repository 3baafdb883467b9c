//! Item table column policy
//!
//! The single table deciding how the column budget of each width band is split
//! between the item columns. Every entry satisfies
//! `name + qty + price + total + separators == band.columns()`.

use shared::{Verbosity, WidthBand};

/// Widths of the item table columns, single-space separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub qty: usize,
    /// Unit price column, absent in compact layouts
    pub price: Option<usize>,
    pub total: usize,
}

impl ColumnLayout {
    const fn new(name: usize, qty: usize, price: Option<usize>, total: usize) -> Self {
        Self {
            name,
            qty,
            price,
            total,
        }
    }

    pub const fn resolve(band: WidthBand, verbosity: Verbosity) -> Self {
        use Verbosity::*;
        use WidthBand::*;
        match (band, verbosity) {
            (Narrow, Compact) => Self::new(16, 3, None, 9),
            (Narrow, Standard | Detailed) => Self::new(10, 3, Some(7), 7),
            (Medium, Compact) => Self::new(18, 3, None, 9),
            (Medium, Standard | Detailed) => Self::new(12, 3, Some(7), 7),
            (Wide, Compact) => Self::new(30, 5, None, 11),
            (Wide, Standard) => Self::new(22, 5, Some(9), 9),
            (Wide, Detailed) => Self::new(24, 4, Some(9), 8),
        }
    }

    /// Total cells of a row, separators included
    pub const fn row_width(&self) -> usize {
        match self.price {
            Some(price) => self.name + self.qty + price + self.total + 3,
            None => self.name + self.qty + self.total + 2,
        }
    }

    /// Quantity header label; narrow tables get a single character
    pub const fn qty_label(band: WidthBand) -> &'static str {
        match band {
            WidthBand::Narrow | WidthBand::Medium => "Q",
            WidthBand::Wide => "Qty",
        }
    }
}
