//! Cart files given on the command line

use std::path::{Path, PathBuf};

use shared::{LayoutProfile, ReceiptRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatArgsError {
    #[error("Cannot read cart file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid cart JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a receipt request from a cart JSON file
///
/// The file carries at least `lineItems` and `total`. When it has no
/// `layout`, the profile derived from the persisted settings is used, so the
/// same cart prints the way the station is configured.
pub fn load_request(path: &Path, fallback: &LayoutProfile) -> Result<ReceiptRequest, FormatArgsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| FormatArgsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_request(&raw, fallback).map_err(|source| FormatArgsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_request(raw: &str, fallback: &LayoutProfile) -> Result<ReceiptRequest, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let has_layout = value.get("layout").is_some();
    let mut request: ReceiptRequest = serde_json::from_value(value)?;
    if !has_layout {
        request.layout = fallback.clone();
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Verbosity;

    #[test]
    fn test_missing_layout_uses_fallback() {
        let fallback = LayoutProfile::new(80, Verbosity::Detailed);
        let req = parse_request(r#"{"lineItems": [], "total": 0}"#, &fallback).unwrap();
        assert_eq!(req.layout, fallback);
    }

    #[test]
    fn test_explicit_layout_wins() {
        let fallback = LayoutProfile::new(80, Verbosity::Detailed);
        let raw = r#"{"lineItems": [], "total": 0, "layout": {"paperWidthMillimeters": 57, "verbosity": "compact"}}"#;
        let req = parse_request(raw, &fallback).unwrap();
        assert_eq!(req.layout.paper_width_millimeters, 57);
        assert_eq!(req.layout.verbosity, Verbosity::Compact);
    }

    #[test]
    fn test_missing_file() {
        let err = load_request(Path::new("/nonexistent/cart.json"), &LayoutProfile::default())
            .unwrap_err();
        assert!(matches!(err, FormatArgsError::Read { .. }));
    }
}
