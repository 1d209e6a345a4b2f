use log::debug;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::api::error::ApiError;
use crate::config::settings::ApiConfig;

const USER_AGENT: &str = concat!("tilawah/", env!("CARGO_PKG_VERSION"));

/// Thin blocking JSON client shared by the API wrappers. No retries.
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, ApiError> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { inner })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(api.timeout_secs)
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let resp = self.inner.get(url.clone()).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

pub fn build_url(base: &str, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    if query.is_empty() {
        Url::parse(&joined).map_err(|e| ApiError::Url(e.to_string()))
    } else {
        Url::parse_with_params(&joined, query.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| ApiError::Url(e.to_string()))
    }
}

/// `{"code": 200, "status": "OK", "data": ...}` as returned by Aladhan and alquran.cloud.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: u16,
    #[serde(default)]
    status: String,
    data: serde_json::Value,
}

pub fn unwrap_envelope<T: DeserializeOwned>(raw: serde_json::Value) -> Result<T, ApiError> {
    let env: Envelope = serde_json::from_value(raw)?;
    if env.code != 200 {
        let detail = match env.data {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(ApiError::Payload(format!("{} {}: {}", env.code, env.status, detail)));
    }
    Ok(serde_json::from_value(env.data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_joins_and_encodes() {
        let url = build_url(
            "https://api.aladhan.com/v1/",
            "/timingsByCity/19-10-2026",
            &[("city", "New York".to_string()), ("country", "US".to_string())],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.aladhan.com/v1/timingsByCity/19-10-2026?city=New+York&country=US"
        );
    }

    #[test]
    fn envelope_error_is_surfaced() {
        let raw = json!({"code": 400, "status": "BAD_REQUEST", "data": "Please specify a city."});
        let err = unwrap_envelope::<serde_json::Value>(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error: 400 BAD_REQUEST: Please specify a city."
        );
    }

    #[test]
    fn envelope_ok_yields_data() {
        let raw = json!({"code": 200, "status": "OK", "data": [1, 2, 3]});
        let data: Vec<u8> = unwrap_envelope(raw).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }
}
