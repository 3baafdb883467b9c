//! Local network print service client
//!
//! The service accepts `POST http://<host>:<port>/print` with a JSON body
//! `{ "text": string, "copies": number, "width": number }`. Any non-success
//! status counts as a failure. On failure the receipt text is logged under the
//! `manual_print` target so the operator can still print it by hand.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::{PrintError, PrintResult};

/// Request body understood by the print service
#[derive(Debug, Serialize)]
struct PrintPayload<'a> {
    text: &'a str,
    copies: u32,
    width: u32,
}

/// Client for the local print-spooling service
#[derive(Debug, Clone)]
pub struct NetworkPrintService {
    endpoint: String,
    client: reqwest::Client,
}

impl NetworkPrintService {
    /// Create a client for `http://host:port/print` with a 5 second timeout
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::with_timeout(host, port, Duration::from_secs(5))
    }

    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> PrintResult<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(PrintError::InvalidConfig("empty print service host".to_string()));
        }
        let endpoint = format!("http://{}:{}/print", host, port);
        reqwest::Url::parse(&endpoint)
            .map_err(|e| PrintError::InvalidConfig(format!("{}: {}", endpoint, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PrintError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit one print request
    ///
    /// `copies` is clamped to at least one. `width` is the paper width hint in
    /// millimeters.
    #[instrument(skip(self, text), fields(endpoint = %self.endpoint, text_len = text.len()))]
    pub async fn send(&self, text: &str, copies: u32, width: u32) -> PrintResult<()> {
        let payload = PrintPayload {
            text,
            copies: copies.max(1),
            width,
        };

        let reason = match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(status = %resp.status(), copies = payload.copies, "Print service accepted job");
                return Ok(());
            }
            Ok(resp) => format!("HTTP {}", resp.status()),
            Err(e) if e.is_timeout() => format!("timeout: {}", e),
            Err(e) => e.to_string(),
        };

        warn!(
            target: "manual_print",
            endpoint = %self.endpoint,
            reason = %reason,
            "Print service unavailable, receipt text follows for manual printing\n{}",
            text
        );
        Err(PrintError::ServiceUnavailable(format!("{}: {}", self.endpoint, reason)))
    }
}
