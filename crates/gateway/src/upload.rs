//! File-upload collaborator (material photos).
//!
//! Three-step flow against the drive API: upload bytes → move/rename into
//! the shared folder → grant anyone-with-link read. The viewer URL is only
//! public after the permission grant lands.

use std::time::Duration;

use crate::{GatewayError, Uploader};

const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

/// Drive upload client (blocking).
#[derive(Clone)]
pub struct UploadClient {
    http: reqwest::blocking::Client,
    api_base: String,
    folder_id: String,
    token: String,
}

impl UploadClient {
    pub fn new(folder_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, folder_id, token)
    }

    pub fn with_api_base(
        api_base: impl Into<String>,
        folder_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("sfms/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            folder_id: folder_id.into(),
            token: token.into(),
        }
    }

    /// Upload raw bytes; returns the new file id.
    pub fn upload(&self, bytes: &[u8]) -> Result<String, GatewayError> {
        let url = format!(
            "{}/upload/drive/v3/files?uploadType=media",
            self.api_base
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        let json = into_json(response)?;
        json_str(&json, "id")
    }

    /// Name the file and move it into the configured folder.
    pub fn attach(&self, file_id: &str, name: &str) -> Result<(), GatewayError> {
        let url = format!(
            "{}/drive/v3/files/{}?addParents={}",
            self.api_base, file_id, self.folder_id
        );
        let body = serde_json::json!({ "name": name });
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        into_json(response)?;
        Ok(())
    }

    /// Grant anyone-with-link read access. Required before the viewer URL
    /// works for the frontend.
    pub fn grant_public(&self, file_id: &str) -> Result<(), GatewayError> {
        let url = format!("{}/drive/v3/files/{}/permissions", self.api_base, file_id);
        let body = serde_json::json!({ "role": "reader", "type": "anyone" });
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        into_json(response)?;
        Ok(())
    }

    /// Stable viewer URL for a file id.
    pub fn viewer_url(&self, file_id: &str) -> String {
        format!("https://drive.google.com/uc?id={}", file_id)
    }
}

impl Uploader for UploadClient {
    fn upload_public(&self, name: &str, bytes: &[u8]) -> Result<String, GatewayError> {
        let file_id = self.upload(bytes)?;
        self.attach(&file_id, name)?;
        self.grant_public(&file_id)?;
        Ok(self.viewer_url(&file_id))
    }
}

fn into_json(response: reqwest::blocking::Response) -> Result<serde_json::Value, GatewayError> {
    let status = response.status().as_u16();
    if !response.status().is_success() {
        let body = response.text().unwrap_or_default();
        return Err(GatewayError::Http(status, body));
    }
    response
        .json()
        .map_err(|e| GatewayError::Parse(e.to_string()))
}

fn json_str(json: &serde_json::Value, key: &str) -> Result<String, GatewayError> {
    json[key]
        .as_str()
        .map(String::from)
        .ok_or_else(|| GatewayError::Parse(format!("Missing {} in response", key)))
}
