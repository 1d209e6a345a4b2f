use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::api::client::{build_url, unwrap_envelope, HttpClient};
use crate::api::error::ApiError;
use crate::models::{PrayerTimings, TimingsSource};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTimings {
    fajr: String,
    sunrise: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

#[derive(Debug, Deserialize)]
struct HijriMonth {
    en: String,
}

#[derive(Debug, Deserialize)]
struct RawHijri {
    day: String,
    month: HijriMonth,
    year: String,
}

#[derive(Debug, Deserialize)]
struct RawDate {
    hijri: Option<RawHijri>,
}

#[derive(Debug, Deserialize)]
struct RawDay {
    timings: RawTimings,
    date: Option<RawDate>,
}

/// Aladhan method id for a calculation-method name; `None` when the API has no equivalent.
pub fn method_id(name: &str) -> Option<u8> {
    match name {
        "Karachi" => Some(1),
        "NorthAmerica" => Some(2),
        "MuslimWorldLeague" => Some(3),
        "UmmAlQura" => Some(4),
        "Egyptian" => Some(5),
        "Tehran" => Some(7),
        "Kuwait" => Some(9),
        "Qatar" => Some(10),
        "Singapore" => Some(11),
        "Turkey" => Some(13),
        "MoonsightingCommittee" => Some(15),
        "Dubai" => Some(16),
        _ => None,
    }
}

/// Aladhan `school` parameter: 0 = Shafi (standard), 1 = Hanafi.
pub fn school(madhab: &str) -> u8 {
    if madhab.eq_ignore_ascii_case("hanafi") { 1 } else { 0 }
}

/// Accepts "05:12" as well as "05:12 (EET)".
fn parse_hm(raw: &str) -> Result<NaiveTime, ApiError> {
    let hm = raw.split_whitespace().next().unwrap_or_default();
    NaiveTime::parse_from_str(hm, "%H:%M")
        .map_err(|e| ApiError::Payload(format!("bad time '{}': {}", raw, e)))
}

fn date_segment(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub(crate) fn decode_day(date: NaiveDate, raw: serde_json::Value) -> Result<PrayerTimings, ApiError> {
    let day: RawDay = unwrap_envelope(raw)?;
    let t = &day.timings;
    let hijri = day
        .date
        .and_then(|d| d.hijri)
        .map(|h| format!("{} {} {}", h.day.trim_start_matches('0'), h.month.en, h.year));

    Ok(PrayerTimings {
        date,
        fajr: parse_hm(&t.fajr)?,
        sunrise: parse_hm(&t.sunrise)?,
        zuhr: parse_hm(&t.dhuhr)?,
        asr: parse_hm(&t.asr)?,
        maghrib: parse_hm(&t.maghrib)?,
        isha: parse_hm(&t.isha)?,
        source: TimingsSource::Online,
        hijri,
    })
}

pub struct AladhanApi<'a> {
    client: &'a HttpClient,
    base: &'a str,
}

impl<'a> AladhanApi<'a> {
    pub fn new(client: &'a HttpClient, base: &'a str) -> Self {
        Self { client, base }
    }

    pub fn timings_by_coords(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        method: u8,
        school: u8,
    ) -> Result<PrayerTimings, ApiError> {
        let url = build_url(
            self.base,
            &format!("timings/{}", date_segment(date)),
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("method", method.to_string()),
                ("school", school.to_string()),
            ],
        )?;
        decode_day(date, self.client.get_json(&url)?)
    }

    pub fn timings_by_city(
        &self,
        date: NaiveDate,
        city: &str,
        country: &str,
        method: u8,
        school: u8,
    ) -> Result<PrayerTimings, ApiError> {
        let url = build_url(
            self.base,
            &format!("timingsByCity/{}", date_segment(date)),
            &[
                ("city", city.to_string()),
                ("country", country.to_string()),
                ("method", method.to_string()),
                ("school", school.to_string()),
            ],
        )?;
        decode_day(date, self.client.get_json(&url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> serde_json::Value {
        json!({
            "code": 200,
            "status": "OK",
            "data": {
                "timings": {
                    "Fajr": "04:51", "Sunrise": "06:09", "Dhuhr": "12:22",
                    "Asr": "15:44", "Sunset": "18:35", "Maghrib": "18:35",
                    "Isha": "20:05 (+03)", "Imsak": "04:41", "Midnight": "00:22"
                },
                "date": {
                    "readable": "19 Oct 2026",
                    "hijri": {
                        "date": "08-05-1448",
                        "day": "08",
                        "month": {"number": 5, "en": "Jumādá al-ūlá", "ar": "جمادى الأولى"},
                        "year": "1448"
                    }
                },
                "meta": {"method": {"id": 4}}
            }
        })
    }

    #[test]
    fn decodes_timings_and_hijri() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let times = decode_day(date, fixture()).unwrap();
        assert_eq!(times.fajr, NaiveTime::from_hms_opt(4, 51, 0).unwrap());
        assert_eq!(times.isha, NaiveTime::from_hms_opt(20, 5, 0).unwrap());
        assert_eq!(times.source, TimingsSource::Online);
        assert_eq!(times.hijri.as_deref(), Some("8 Jumādá al-ūlá 1448"));
    }

    #[test]
    fn missing_prayer_is_a_decode_error() {
        let raw = json!({"code": 200, "status": "OK", "data": {"timings": {"Fajr": "04:51"}}});
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(matches!(decode_day(date, raw), Err(ApiError::Decode(_))));
    }

    #[test]
    fn method_and_school_mapping() {
        assert_eq!(method_id("UmmAlQura"), Some(4));
        assert_eq!(method_id("Other"), None);
        assert_eq!(school("Hanafi"), 1);
        assert_eq!(school("Shafi"), 0);
    }
}
