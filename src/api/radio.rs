use log::warn;
use serde::Deserialize;

use crate::api::client::{build_url, HttpClient};
use crate::api::error::ApiError;
use crate::data::radios::fallback_stations;
use crate::models::RadioStation;

#[derive(Debug, Deserialize)]
struct RadioList {
    radios: Vec<RawRadio>,
}

#[derive(Debug, Deserialize)]
struct RawRadio {
    id: u32,
    name: String,
    url: String,
}

pub(crate) fn decode_stations(raw: serde_json::Value) -> Result<Vec<RadioStation>, ApiError> {
    let list: RadioList = serde_json::from_value(raw)?;
    Ok(list
        .radios
        .into_iter()
        .map(|r| RadioStation {
            id: r.id,
            name: r.name.trim().to_string(),
            url: r.url,
        })
        .collect())
}

fn fetch(client: &HttpClient, base: &str) -> Result<Vec<RadioStation>, ApiError> {
    let url = build_url(base, "radios", &[("language", "eng".to_string())])?;
    decode_stations(client.get_json(&url)?)
}

/// Station directory, or the builtin list when it cannot be fetched.
pub fn stations(client: Option<&HttpClient>, base: &str) -> Vec<RadioStation> {
    let Some(client) = client else {
        return fallback_stations();
    };
    match fetch(client, base) {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => fallback_stations(),
        Err(e) => {
            warn!("Radio directory unavailable, using builtin stations: {}", e);
            fallback_stations()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_directory() {
        let raw = json!({"radios": [
            {"id": 10, "name": " Yasser Al-Dosari ", "url": "https://backup.qurango.net/radio/yasser", "recent_date": "2024-01-01"}
        ]});
        let list = decode_stations(raw).unwrap();
        assert_eq!(list[0].id, 10);
        assert_eq!(list[0].name, "Yasser Al-Dosari");
    }

    #[test]
    fn offline_uses_builtin_list() {
        let list = stations(None, "https://mp3quran.net/api/v3");
        assert!(!list.is_empty());
        assert_eq!(list, fallback_stations());
    }
}
