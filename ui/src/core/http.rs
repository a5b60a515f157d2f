//! Backend client: one form-encoded POST per graph request.

use crate::core::format;
use crate::core::platform;
use crate::core::series::GraphResponse;

/// The finished request parameters, dates already converted to ISO-8601 UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQuery {
    pub start_date: String,
    pub end_date: String,
    pub metric: String,
    pub devices: Vec<String>,
}

impl GraphQuery {
    /// Build a query from raw form values. Fails when either date does not
    /// parse as a `datetime-local` value.
    pub fn from_form(
        start: &str,
        end: &str,
        metric: &str,
        devices: Vec<String>,
    ) -> Result<Self, String> {
        Ok(Self {
            start_date: format::input_to_iso_utc(start)?,
            end_date: format::input_to_iso_utc(end)?,
            metric: metric.to_string(),
            devices,
        })
    }

    /// `application/x-www-form-urlencoded` body. The device set is serialized
    /// as repeated `devices` values.
    pub fn form_body(&self) -> String {
        let mut pairs: Vec<String> = vec![
            pair("start_date", &self.start_date),
            pair("end_date", &self.end_date),
            pair("metric", &self.metric),
        ];
        pairs.extend(self.devices.iter().map(|device| pair("devices", device)));
        pairs.join("&")
    }
}

fn pair(key: &str, value: &str) -> String {
    format!("{key}={}", urlencoding::encode(value))
}

/// Thin wrapper over a shared `reqwest::Client` plus the resolved endpoint
/// and API key. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GraphClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Endpoint and API key from the page URL on the web target, from the
    /// environment on desktop.
    pub fn from_environment() -> Self {
        Self::new(platform::endpoint_url(), platform::api_key())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue the POST and decode the envelope. The error string is the
    /// underlying transport or parse message, without presentation prefixes;
    /// the caller owns the user-facing wording.
    pub async fn fetch_readings(&self, query: &GraphQuery) -> Result<GraphResponse, String> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("X-API-Key", &self.api_key)
            .body(query.form_body())
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let raw = response.text().await.map_err(|err| err.to_string())?;
        parse_envelope(&raw)
    }
}

/// Decode a response body into the envelope.
pub fn parse_envelope(raw: &str) -> Result<GraphResponse, String> {
    serde_json::from_str(raw).map_err(|err| err.to_string())
}
