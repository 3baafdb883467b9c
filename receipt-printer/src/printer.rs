//! Direct byte channels for sending ESC/POS data
//!
//! Supports:
//! - Serial printers (USB-serial / RS-232, fixed 9600 baud 8N1)
//! - Network printers (raw TCP, port 9100)
//!
//! Every send opens the channel, writes, flushes and shuts the channel down.
//! The shutdown runs whether or not the write succeeded; nothing is kept open
//! between print actions.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, StopBits};
use tracing::{info, instrument, warn};

use crate::error::{PrintError, PrintResult, TransportError};

/// Fixed serial communication rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default raw printing port
pub const RAW_PRINT_PORT: u16 = 9100;

/// Locally reachable byte channel to a printer
#[async_trait]
pub trait DirectChannel: Send + Sync {
    /// Send raw ESC/POS data to the printer
    async fn send(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;

    /// Human-readable target, for logs
    fn describe(&self) -> String;
}

/// Write everything, flush, then shut the stream down regardless of outcome
async fn write_then_close<S>(stream: &mut S, data: &[u8]) -> Result<(), TransportError>
where
    S: AsyncWrite + Unpin,
{
    let written = async {
        stream.write_all(data).await?;
        stream.flush().await
    }
    .await;

    if let Err(e) = stream.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }

    written.map_err(|e| TransportError::Write(e.to_string()))
}

/// Network printer (raw TCP port 9100)
///
/// Most Ethernet thermal printers accept raw ESC/POS on port 9100.
#[derive(Debug, Clone)]
pub struct TcpChannel {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpChannel {
    /// Printer at `host:port`; the host must be an IP literal
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl DirectChannel for TcpChannel {
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| TransportError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    TransportError::Denied(format!("{}: {}", self.addr, e))
                }
                _ => TransportError::Unavailable(format!("{}: {}", self.addr, e)),
            })?;

        info!("Connected, sending {} bytes", data.len());
        write_then_close(&mut stream, data).await?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.addr)
    }
}

/// Serial printer at a fixed baud rate (8 data bits, no parity, 1 stop bit)
#[derive(Debug, Clone)]
pub struct SerialChannel {
    path: String,
    baud_rate: u32,
    timeout: Duration,
}

impl SerialChannel {
    /// Serial printer at the fixed 9600 baud rate
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(2),
        }
    }

    /// Set the per-operation timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// List serial port names present on this machine
    pub fn available_ports() -> Vec<String> {
        tokio_serial::available_ports()
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.port_name)
            .collect()
    }

    fn open(&self) -> Result<tokio_serial::SerialStream, TransportError> {
        tokio_serial::new(&self.path, self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.timeout)
            .open_native_async()
            .map_err(|e| open_error(&self.path, e))
    }
}

fn open_error(path: &str, e: tokio_serial::Error) -> TransportError {
    match e.kind() {
        tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            TransportError::Denied(format!("{}: {}", path, e))
        }
        _ => TransportError::Unavailable(format!("{}: {}", path, e)),
    }
}

#[async_trait]
impl DirectChannel for SerialChannel {
    #[instrument(skip(self, data), fields(port = %self.path, baud = self.baud_rate, data_len = data.len()))]
    async fn send(&self, data: &[u8]) -> PrintResult<()> {
        let mut port = self.open()?;
        info!("Serial port open, sending {} bytes", data.len());

        write_then_close(&mut port, data).await?;
        drop(port);

        info!("Print job sent successfully");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        Self::available_ports().iter().any(|p| p == &self.path)
    }

    fn describe(&self) -> String {
        format!("serial://{}@{}", self.path, self.baud_rate)
    }
}
