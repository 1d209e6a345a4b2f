use anyhow::Context;
use log::debug;
use rusqlite::Connection;
use serde::Deserialize;

use crate::api::client::{build_url, unwrap_envelope, HttpClient};
use crate::api::error::ApiError;
use crate::db::repository::SurahCacheRepo;
use crate::models::{Ayah, Reciter, SurahText};

/// Arabic script edition paired with every translation.
pub const ARABIC_EDITION: &str = "quran-uthmani";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAyah {
    number: u32,
    text: String,
    number_in_surah: u16,
    juz: u8,
    page: u16,
}

#[derive(Debug, Deserialize)]
struct RawEdition {
    identifier: String,
}

#[derive(Debug, Deserialize)]
struct RawEditionSurah {
    number: u16,
    ayahs: Vec<RawAyah>,
    edition: RawEdition,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAudioEdition {
    identifier: String,
    name: String,
    english_name: String,
}

/// Merge the Arabic and translation editions of one surah by ayah position.
pub(crate) fn decode_surah(translation: &str, raw: serde_json::Value) -> Result<SurahText, ApiError> {
    let editions: Vec<RawEditionSurah> = unwrap_envelope(raw)?;

    let arabic = editions
        .iter()
        .find(|e| e.edition.identifier == ARABIC_EDITION)
        .ok_or_else(|| ApiError::Payload(format!("response lacks {}", ARABIC_EDITION)))?;
    let translated = editions.iter().find(|e| e.edition.identifier == translation);

    let ayahs = arabic
        .ayahs
        .iter()
        .map(|a| Ayah {
            number_global: a.number,
            number_in_surah: a.number_in_surah,
            text_ar: a.text.clone(),
            text_translation: translated.and_then(|t| {
                t.ayahs
                    .iter()
                    .find(|x| x.number_in_surah == a.number_in_surah)
                    .map(|x| x.text.clone())
            }),
            juz: a.juz,
            page: a.page,
        })
        .collect();

    Ok(SurahText {
        surah: arabic.number,
        edition: translation.to_string(),
        ayahs,
    })
}

pub struct AlQuranApi<'a> {
    client: &'a HttpClient,
    base: &'a str,
}

impl<'a> AlQuranApi<'a> {
    pub fn new(client: &'a HttpClient, base: &'a str) -> Self {
        Self { client, base }
    }

    pub fn surah_text(&self, number: u16, translation: &str) -> Result<SurahText, ApiError> {
        let url = build_url(
            self.base,
            &format!("surah/{}/editions/{},{}", number, ARABIC_EDITION, translation),
            &[],
        )?;
        decode_surah(translation, self.client.get_json(&url)?)
    }

    pub fn reciters(&self) -> Result<Vec<Reciter>, ApiError> {
        let url = build_url(
            self.base,
            "edition",
            &[
                ("format", "audio".to_string()),
                ("language", "ar".to_string()),
                ("type", "versebyverse".to_string()),
            ],
        )?;
        let raw: Vec<RawAudioEdition> = unwrap_envelope(self.client.get_json(&url)?)?;
        Ok(raw
            .into_iter()
            .map(|r| Reciter {
                identifier: r.identifier,
                name: r.name,
                english_name: r.english_name,
            })
            .collect())
    }
}

/// Surah text from the local cache, fetching and caching it on a miss.
/// With no `api` (offline mode) only cached surahs can be read.
pub fn load_surah(
    conn: &Connection,
    api: Option<&AlQuranApi>,
    number: u16,
    translation: &str,
) -> anyhow::Result<SurahText> {
    if let Some(text) = SurahCacheRepo::get(conn, number, translation)? {
        debug!("Surah {} ({}) served from cache", number, translation);
        return Ok(text);
    }
    let Some(api) = api else {
        anyhow::bail!(
            "Surah {} ({}) is not cached and online access is disabled",
            number,
            translation
        );
    };
    let text = api
        .surah_text(number, translation)
        .with_context(|| format!("Fetching surah {} from alquran.cloud", number))?;
    SurahCacheRepo::store(conn, &text)?;
    Ok(text)
}

pub fn ayah_audio_url(cdn: &str, reciter: &str, global_ayah: u32, bitrate: u32) -> String {
    format!(
        "{}/quran/audio/{}/{}/{}.mp3",
        cdn.trim_end_matches('/'),
        bitrate,
        reciter,
        global_ayah
    )
}

pub fn surah_audio_url(cdn: &str, reciter: &str, surah: u16, bitrate: u32) -> String {
    format!(
        "{}/quran/audio-surah/{}/{}/{}.mp3",
        cdn.trim_end_matches('/'),
        bitrate,
        reciter,
        surah
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edition(id: &str, texts: &[&str]) -> serde_json::Value {
        let ayahs: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                json!({
                    "number": 6231 + i as u32, "text": t, "numberInSurah": i + 1,
                    "juz": 30, "manzil": 7, "page": 604, "ruku": 556,
                    "hizbQuarter": 240, "sajda": false
                })
            })
            .collect();
        json!({
            "number": 113, "name": "سُورَةُ الفَلَقِ", "englishName": "Al-Falaq",
            "englishNameTranslation": "The Dawn", "revelationType": "Meccan",
            "numberOfAyahs": texts.len(), "ayahs": ayahs,
            "edition": {"identifier": id, "language": "en", "format": "text"}
        })
    }

    #[test]
    fn zips_editions_by_ayah() {
        let raw = json!({
            "code": 200, "status": "OK",
            "data": [
                edition(ARABIC_EDITION, &["قُلْ أَعُوذُ بِرَبِّ ٱلْفَلَقِ", "مِن شَرِّ مَا خَلَقَ"]),
                edition("en.asad", &["SAY: I seek refuge with the Sustainer of the rising dawn,", "from the evil of aught that He has created,"]),
            ]
        });
        let text = decode_surah("en.asad", raw).unwrap();
        assert_eq!(text.surah, 113);
        assert_eq!(text.ayahs.len(), 2);
        assert_eq!(text.ayahs[1].number_global, 6232);
        assert_eq!(
            text.ayahs[1].text_translation.as_deref(),
            Some("from the evil of aught that He has created,")
        );
    }

    #[test]
    fn arabic_edition_is_required() {
        let raw = json!({"code": 200, "status": "OK", "data": [edition("en.asad", &["x"])]});
        assert!(matches!(decode_surah("en.asad", raw), Err(ApiError::Payload(_))));
    }

    #[test]
    fn audio_urls() {
        assert_eq!(
            ayah_audio_url("https://cdn.islamic.network/", "ar.alafasy", 262, 128),
            "https://cdn.islamic.network/quran/audio/128/ar.alafasy/262.mp3"
        );
        assert_eq!(
            surah_audio_url("https://cdn.islamic.network", "ar.alafasy", 36, 64),
            "https://cdn.islamic.network/quran/audio-surah/64/ar.alafasy/36.mp3"
        );
    }

    #[test]
    fn offline_load_reads_cache_only() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();
        assert!(load_surah(&conn, None, 112, "en.asad").is_err());

        let raw = json!({
            "code": 200, "status": "OK",
            "data": [edition(ARABIC_EDITION, &["قُلْ هُوَ ٱللَّهُ أَحَدٌ"]), edition("en.asad", &["SAY: He is the One God"])]
        });
        let text = decode_surah("en.asad", raw).unwrap();
        SurahCacheRepo::store(&conn, &text).unwrap();

        let loaded = load_surah(&conn, None, 113, "en.asad").unwrap();
        assert_eq!(loaded, text);
    }
}
