//! `sheetfms-gateway` — the spreadsheet as a remote collaborator.
//!
//! The rest of the system reaches the spreadsheet and the file store only
//! through the narrow traits here. `HttpSheetsGateway` and `UploadClient`
//! are blocking reqwest clients (no async runtime required);
//! `MemoryGateway` backs tests and the CLI fixture mode.

pub mod client;
pub mod memory;
pub mod upload;

use std::fmt;

pub use client::HttpSheetsGateway;
pub use memory::{MemoryGateway, MemoryUploader};
pub use upload::UploadClient;

/// One range-addressed write, batched by `batch_write`.
#[derive(Debug, Clone)]
pub struct RangeWrite {
    pub range: String,
    pub values: Vec<Vec<String>>,
}

/// Range reads and writes against one spreadsheet document.
///
/// All ranges are A1 notation (`Sheet!A8:CK`); reads come back with
/// trailing blank rows and cells trimmed, the way the remote API behaves.
pub trait SheetsGateway {
    fn read(&self, range: &str) -> Result<Vec<Vec<String>>, GatewayError>;
    fn batch_read(&self, ranges: &[String]) -> Result<Vec<Vec<Vec<String>>>, GatewayError>;
    fn write(&self, range: &str, values: &[Vec<String>]) -> Result<(), GatewayError>;
    fn batch_write(&self, writes: &[RangeWrite]) -> Result<(), GatewayError>;
    fn append(&self, range: &str, values: &[Vec<String>]) -> Result<(), GatewayError>;
}

/// File-upload collaborator: store bytes, make them public, hand back a
/// stable viewer URL.
pub trait Uploader {
    fn upload_public(&self, name: &str, bytes: &[u8]) -> Result<String, GatewayError>;
}

/// Error type for gateway operations.
#[derive(Debug)]
pub enum GatewayError {
    /// No token configured.
    NotAuthenticated,
    /// Network error.
    Network(String),
    /// HTTP error with status code.
    Http(u16, String),
    /// Response body did not parse.
    Parse(String),
    /// A1 range rejected (bad syntax or unknown sheet).
    BadRange(String),
    /// File I/O error.
    Io(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::NotAuthenticated => {
                write!(f, "Not authenticated — no API token configured")
            }
            GatewayError::Network(msg) => write!(f, "Network error: {}", msg),
            GatewayError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            GatewayError::Parse(msg) => write!(f, "Parse error: {}", msg),
            GatewayError::BadRange(msg) => write!(f, "Bad range: {}", msg),
            GatewayError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}
