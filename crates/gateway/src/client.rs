//! Blocking HTTP client for the remote sheets API.
//!
//! Covers the five value operations the services use: get, batchGet,
//! update, batchUpdate, append. Bearer-token auth, 30 s timeout.

use std::time::Duration;

use crate::{GatewayError, RangeWrite, SheetsGateway};

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Sheets API client (blocking), bound to one spreadsheet document.
#[derive(Clone)]
pub struct HttpSheetsGateway {
    http: reqwest::blocking::Client,
    api_base: String,
    spreadsheet_id: String,
    token: String,
}

impl HttpSheetsGateway {
    pub fn new(spreadsheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, spreadsheet_id, token)
    }

    /// Point at a non-default API base (tests, regional endpoints).
    pub fn with_api_base(
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("sfms/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
        }
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values{}",
            self.api_base, self.spreadsheet_id, suffix
        )
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn get(&self, url: &str) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Self::into_json(response)
    }

    fn send_json(
        &self,
        req: reqwest::blocking::RequestBuilder,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let response = req
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Self::into_json(response)
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
}

impl SheetsGateway for HttpSheetsGateway {
    fn read(&self, range: &str) -> Result<Vec<Vec<String>>, GatewayError> {
        let url = self.values_url(&format!("/{}", encode_range(range)));
        let json = self.get(&url)?;
        Ok(values_from_json(&json["values"]))
    }

    fn batch_read(&self, ranges: &[String]) -> Result<Vec<Vec<Vec<String>>>, GatewayError> {
        let query: Vec<String> = ranges
            .iter()
            .map(|r| format!("ranges={}", encode_range(r)))
            .collect();
        let url = format!("{}?{}", self.values_url(":batchGet"), query.join("&"));
        let json = self.get(&url)?;

        let value_ranges = json["valueRanges"]
            .as_array()
            .ok_or_else(|| GatewayError::Parse("missing valueRanges in response".into()))?;
        Ok(value_ranges
            .iter()
            .map(|vr| values_from_json(&vr["values"]))
            .collect())
    }

    fn write(&self, range: &str, values: &[Vec<String>]) -> Result<(), GatewayError> {
        let url = format!(
            "{}?valueInputOption=USER_ENTERED",
            self.values_url(&format!("/{}", encode_range(range)))
        );
        let body = serde_json::json!({ "range": range, "values": values });
        self.send_json(self.http.put(&url), &body)?;
        Ok(())
    }

    fn batch_write(&self, writes: &[RangeWrite]) -> Result<(), GatewayError> {
        if writes.is_empty() {
            return Ok(());
        }
        let data: Vec<serde_json::Value> = writes
            .iter()
            .map(|w| serde_json::json!({ "range": w.range, "values": w.values }))
            .collect();
        let body = serde_json::json!({
            "valueInputOption": "USER_ENTERED",
            "data": data,
        });
        let url = self.values_url(":batchUpdate");
        self.send_json(self.http.post(&url), &body)?;
        Ok(())
    }

    fn append(&self, range: &str, values: &[Vec<String>]) -> Result<(), GatewayError> {
        let url = format!(
            "{}?valueInputOption=USER_ENTERED",
            self.values_url(&format!("/{}:append", encode_range(range)))
        );
        let body = serde_json::json!({ "values": values });
        self.send_json(self.http.post(&url), &body)?;
        Ok(())
    }
}

/// Cells arrive as JSON strings, but numbers and bools show up when a
/// range was written by another tool. Everything becomes a string here.
fn values_from_json(values: &serde_json::Value) -> Vec<Vec<String>> {
    let Some(rows) = values.as_array() else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| {
            row.as_array()
                .map(|cells| cells.iter().map(cell_to_string).collect())
                .unwrap_or_default()
        })
        .collect()
}

fn cell_to_string(cell: &serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Percent-encode the characters that actually occur in A1 ranges.
fn encode_range(range: &str) -> String {
    let mut out = String::with_capacity(range.len());
    for c in range.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '!' => out.push_str("%21"),
            '\'' => out.push_str("%27"),
            ':' => out.push_str("%3A"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_range_covers_a1_charset() {
        assert_eq!(encode_range("FMS!A7:CK"), "FMS%21A7%3ACK");
        assert_eq!(
            encode_range("'Payment Sheet'!A8:F"),
            "%27Payment%20Sheet%27%21A8%3AF"
        );
    }

    #[test]
    fn mixed_cell_types_become_strings() {
        let json = serde_json::json!([["a", 12, true], [null, 3.5]]);
        let values = values_from_json(&json);
        assert_eq!(values[0], vec!["a", "12", "true"]);
        assert_eq!(values[1], vec!["", "3.5"]);
    }

    #[test]
    fn absent_values_key_is_empty_grid() {
        let json = serde_json::json!({ "range": "FMS!A7:CK" });
        assert!(values_from_json(&json["values"]).is_empty());
    }
}
