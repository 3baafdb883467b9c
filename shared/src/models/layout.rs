//! Layout profile model
//!
//! Paper width is stored as raw millimeters so that values coming from
//! persisted settings survive untouched; [`PaperWidth::from_mm`] resolves them
//! to one of the supported widths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical paper width band
///
/// Each band owns a fixed character-column budget. Wider bands never have a
/// smaller budget than narrower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthBand {
    Narrow,
    Medium,
    Wide,
}

impl WidthBand {
    /// Character columns per printed line (Font A)
    pub const fn columns(self) -> usize {
        match self {
            WidthBand::Narrow => 30,
            WidthBand::Medium => 32,
            WidthBand::Wide => 48,
        }
    }
}

/// Supported thermal paper widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperWidth {
    #[serde(rename = "57")]
    Mm57,
    #[serde(rename = "58")]
    Mm58,
    #[serde(rename = "80")]
    Mm80,
}

impl PaperWidth {
    pub const ALL: [PaperWidth; 3] = [PaperWidth::Mm57, PaperWidth::Mm58, PaperWidth::Mm80];

    /// Resolve a width in millimeters
    ///
    /// Unrecognized widths fall back to the narrowest budget.
    pub fn from_mm(mm: u32) -> Self {
        match mm {
            57 => PaperWidth::Mm57,
            58 => PaperWidth::Mm58,
            80 => PaperWidth::Mm80,
            other => {
                tracing::debug!(width_mm = other, "unknown paper width, using 57mm budget");
                PaperWidth::Mm57
            }
        }
    }

    pub const fn millimeters(self) -> u32 {
        match self {
            PaperWidth::Mm57 => 57,
            PaperWidth::Mm58 => 58,
            PaperWidth::Mm80 => 80,
        }
    }

    pub const fn band(self) -> WidthBand {
        match self {
            PaperWidth::Mm57 => WidthBand::Narrow,
            PaperWidth::Mm58 => WidthBand::Medium,
            PaperWidth::Mm80 => WidthBand::Wide,
        }
    }

    /// Column budget for this width
    pub const fn columns(self) -> usize {
        self.band().columns()
    }
}

impl fmt::Display for PaperWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.millimeters())
    }
}

/// Receipt verbosity preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Compact,
    #[default]
    Standard,
    Detailed,
}

impl Verbosity {
    pub const ALL: [Verbosity; 3] = [Verbosity::Compact, Verbosity::Standard, Verbosity::Detailed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Verbosity::Compact => "compact",
            Verbosity::Standard => "standard",
            Verbosity::Detailed => "detailed",
        }
    }

    /// Blank lines appended after the footer so the cutter clears the print
    pub const fn feed_lines(self) -> usize {
        match self {
            Verbosity::Compact => 3,
            Verbosity::Standard => 4,
            Verbosity::Detailed => 5,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Verbosity::Compact),
            "standard" => Ok(Verbosity::Standard),
            "detailed" => Ok(Verbosity::Detailed),
            other => Err(format!("unknown receipt format: {}", other)),
        }
    }
}

/// Where a formatted receipt is delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportTarget {
    /// Locally attached byte channel, network service as fallback
    DirectChannel,
    /// Local network print service only
    NetworkService { host: String, port: u16 },
}

impl Default for TransportTarget {
    fn default() -> Self {
        TransportTarget::NetworkService {
            host: "192.168.1.100".to_string(),
            port: 9100,
        }
    }
}

/// Currency labels used on the grand total lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyLabels {
    /// Localized label, e.g. "ر.س"
    pub local: String,
    /// English code printed in uppercase, e.g. "SAR"
    pub english: String,
}

impl Default for CurrencyLabels {
    fn default() -> Self {
        Self {
            local: "ر.س".to_string(),
            english: "SAR".to_string(),
        }
    }
}

/// Layout profile consumed by the formatter and the print dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutProfile {
    #[serde(default = "default_paper_width_mm")]
    pub paper_width_millimeters: u32,
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default = "default_copies")]
    pub copies: u32,
    #[serde(default = "default_true")]
    pub enable_sound: bool,
    #[serde(default)]
    pub transport: TransportTarget,
    #[serde(default)]
    pub currency: CurrencyLabels,
}

/// Most copies one print job will produce
pub const MAX_COPIES: u32 = 10;

fn default_paper_width_mm() -> u32 {
    58
}

fn default_copies() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl LayoutProfile {
    pub fn new(paper_width_millimeters: u32, verbosity: Verbosity) -> Self {
        Self {
            paper_width_millimeters,
            verbosity,
            ..Self::default()
        }
    }

    pub fn with_copies(mut self, copies: u32) -> Self {
        self.copies = copies;
        self
    }

    pub fn with_sound(mut self, enable_sound: bool) -> Self {
        self.enable_sound = enable_sound;
        self
    }

    pub fn with_transport(mut self, transport: TransportTarget) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_currency(mut self, currency: CurrencyLabels) -> Self {
        self.currency = currency;
        self
    }

    /// Resolved paper width (unknown widths map to the narrowest)
    pub fn paper_width(&self) -> PaperWidth {
        PaperWidth::from_mm(self.paper_width_millimeters)
    }

    /// Character-column budget for every rendered line
    pub fn column_budget(&self) -> usize {
        self.paper_width().columns()
    }

    /// Copy count, clamped to `1..=MAX_COPIES`
    pub fn copies(&self) -> u32 {
        self.copies.clamp(1, MAX_COPIES)
    }
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            paper_width_millimeters: default_paper_width_mm(),
            verbosity: Verbosity::default(),
            copies: default_copies(),
            enable_sound: true,
            transport: TransportTarget::default(),
            currency: CurrencyLabels::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_is_monotonic_in_width() {
        let mut widths = PaperWidth::ALL.to_vec();
        widths.sort_by_key(|w| w.millimeters());
        for pair in widths.windows(2) {
            assert!(pair[0].columns() <= pair[1].columns());
        }
    }

    #[test]
    fn test_unknown_width_falls_back_to_narrowest() {
        let narrowest = PaperWidth::ALL.iter().map(|w| w.columns()).min().unwrap();
        assert_eq!(PaperWidth::from_mm(112).columns(), narrowest);
        assert_eq!(PaperWidth::from_mm(0).columns(), narrowest);
        assert_eq!(LayoutProfile::new(76, Verbosity::Detailed).column_budget(), narrowest);
    }

    #[test]
    fn test_known_widths() {
        assert_eq!(PaperWidth::from_mm(58).columns(), 32);
        assert_eq!(PaperWidth::from_mm(80).columns(), 48);
        assert_eq!(PaperWidth::Mm80.to_string(), "80mm");
    }

    #[test]
    fn test_verbosity_parse() {
        assert_eq!("Detailed".parse::<Verbosity>().unwrap(), Verbosity::Detailed);
        assert!("verbose".parse::<Verbosity>().is_err());
        assert!(Verbosity::Compact.feed_lines() < Verbosity::Detailed.feed_lines());
    }

    #[test]
    fn test_copies_never_zero() {
        let profile = LayoutProfile::default().with_copies(0);
        assert_eq!(profile.copies(), 1);
    }

    #[test]
    fn test_copies_are_capped() {
        assert_eq!(LayoutProfile::default().with_copies(u32::MAX).copies(), MAX_COPIES);
        assert_eq!(LayoutProfile::default().with_copies(MAX_COPIES).copies(), MAX_COPIES);
        assert_eq!(LayoutProfile::default().with_copies(3).copies(), 3);
    }

    #[test]
    fn test_profile_deserialize_defaults() {
        let profile: LayoutProfile =
            serde_json::from_str(r#"{"paperWidthMillimeters": 80, "verbosity": "compact"}"#)
                .unwrap();
        assert_eq!(profile.paper_width(), PaperWidth::Mm80);
        assert_eq!(profile.verbosity, Verbosity::Compact);
        assert_eq!(profile.copies, 1);
        assert!(profile.enable_sound);
    }
}
