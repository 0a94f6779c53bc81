// Application settings
// Loaded from ~/.config/sheetfms/settings.toml

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-workflow sheet override: a deployment whose tabs were renamed or
/// whose header block grew can repoint a workflow without a rebuild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetOverride {
    /// Replacement tab name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    /// Replacement 1-based first data row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_offset: Option<usize>,
}

/// Everything the CLI needs to reach the spreadsheet document.
/// Credential *acquisition* is out of scope; the token lands here by
/// whatever means the deployment uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sheets API base. Only overridden in tests.
    pub api_base: String,
    /// The spreadsheet document id acting as system of record.
    pub spreadsheet_id: String,
    /// Bearer token for the sheets and drive APIs, inline.
    pub token: String,
    /// Alternative to `token`: path to a file holding the token.
    /// The inline token wins when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
    /// Drive folder receiving material photos.
    pub upload_folder_id: String,
    /// Sheet overrides keyed by workflow name (`requirement`,
    /// `contractor`, `debit`, `labour`, `site_expense`).
    pub sheets: BTreeMap<String, SheetOverride>,
    /// Extra workflow definition files (TOML), appended to the built-in
    /// production workflows.
    pub workflow_files: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "https://sheets.googleapis.com/v4".to_string(),
            spreadsheet_id: String::new(),
            token: String::new(),
            token_file: None,
            upload_folder_id: String::new(),
            sheets: BTreeMap::new(),
            workflow_files: Vec::new(),
        }
    }
}

impl Settings {
    /// Default settings path: `<config-dir>/sheetfms/settings.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sheetfms").join("settings.toml"))
    }

    /// Load from the default path; silent defaults when the file is
    /// absent or unreadable (first run).
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &PathBuf) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to(&self, path: &PathBuf) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, raw)
    }

    /// The bearer token: inline value when set, otherwise the trimmed
    /// contents of `token_file`, otherwise empty.
    pub fn resolved_token(&self) -> io::Result<String> {
        if !self.token.is_empty() {
            return Ok(self.token.clone());
        }
        match &self.token_file {
            Some(path) => Ok(fs::read_to_string(path)?.trim().to_string()),
            None => Ok(String::new()),
        }
    }

    /// True once the spreadsheet binding is usable.
    pub fn is_configured(&self) -> bool {
        !self.spreadsheet_id.is_empty() && (!self.token.is_empty() || self.token_file.is_some())
    }
}
