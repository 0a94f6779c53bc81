use std::fmt;

use sheetfms_gateway::GatewayError;

/// Error taxonomy of the service layer. The CLI maps these onto exit
/// codes the way the old HTTP surface mapped them onto 400/404/500.
#[derive(Debug)]
pub enum FmsError {
    /// Missing or malformed input (no retry will help).
    Validation(String),
    /// Workflow config parse / validation error.
    Config(String),
    /// No workflow registered under this name.
    UnknownWorkflow(String),
    /// Workflow exists but has no such stage.
    UnknownStage { workflow: String, stage: String },
    /// Business key absent from the resolved sheet.
    KeyNotFound { sheet: String, key: String },
    /// The sheet had no data rows at all (distinct from a missing key).
    NoData { sheet: String },
    /// Spreadsheet gateway failure. Never retried automatically.
    Gateway(GatewayError),
    /// Photo upload failure or missing upload client.
    Upload(String),
}

impl fmt::Display for FmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Config(msg) => write!(f, "workflow config error: {msg}"),
            Self::UnknownWorkflow(name) => write!(f, "unknown workflow '{name}'"),
            Self::UnknownStage { workflow, stage } => {
                write!(f, "workflow '{workflow}' has no stage '{stage}'")
            }
            Self::KeyNotFound { sheet, key } => {
                write!(f, "key '{key}' not found in sheet '{sheet}'")
            }
            Self::NoData { sheet } => write!(f, "sheet '{sheet}' has no data rows"),
            Self::Gateway(err) => write!(f, "gateway error: {err}"),
            Self::Upload(msg) => write!(f, "upload error: {msg}"),
        }
    }
}

impl std::error::Error for FmsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for FmsError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(err)
    }
}
