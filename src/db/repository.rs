use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{
    AlarmSound, Bookmark, CustomAlarm, PrayerTimings, PrayerType, Reminder, SavedLocation,
    SurahText, TimingsSource,
};

/// Search history keeps only this many recent queries.
pub const HISTORY_LIMIT: usize = 20;

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| anyhow!("Bad time '{}': {}", s, e))
}

fn fmt_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

fn fmt_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

// ─── Cached prayer times ────────────────────────────────────────────────────

pub struct CacheRepo;

impl CacheRepo {
    pub fn get(conn: &Connection, date: NaiveDate, location_key: &str) -> Result<Option<PrayerTimings>> {
        let row = conn
            .query_row(
                "SELECT fajr, sunrise, zuhr, asr, maghrib, isha, source, hijri
                 FROM prayer_times_cache WHERE date = ?1 AND location_key = ?2",
                params![fmt_date(date), location_key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, Option<String>>(7)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((fajr, sunrise, zuhr, asr, maghrib, isha, source, hijri)) => {
                Ok(Some(PrayerTimings {
                    date,
                    fajr: parse_time(&fajr)?,
                    sunrise: parse_time(&sunrise)?,
                    zuhr: parse_time(&zuhr)?,
                    asr: parse_time(&asr)?,
                    maghrib: parse_time(&maghrib)?,
                    isha: parse_time(&isha)?,
                    source: TimingsSource::from_str(&source)?,
                    hijri,
                }))
            }
        }
    }

    pub fn store(conn: &Connection, location_key: &str, times: &PrayerTimings) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO prayer_times_cache
                (date, location_key, fajr, sunrise, zuhr, asr, maghrib, isha, source, hijri)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                fmt_date(times.date),
                location_key,
                fmt_time(times.fajr),
                fmt_time(times.sunrise),
                fmt_time(times.zuhr),
                fmt_time(times.asr),
                fmt_time(times.maghrib),
                fmt_time(times.isha),
                times.source.as_str(),
                times.hijri,
            ],
        )?;
        Ok(())
    }

    pub fn clear_all(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM prayer_times_cache", [])?;
        Ok(())
    }
}

// ─── Reminders ───────────────────────────────────────────────────────────────

pub struct ReminderRepo;

impl ReminderRepo {
    pub fn list(conn: &Connection) -> Result<Vec<Reminder>> {
        let mut stmt = conn.prepare(
            "SELECT id, prayer, minutes_before, enabled, sound FROM reminders
             ORDER BY CASE prayer
               WHEN 'fajr' THEN 1 WHEN 'zuhr' THEN 2 WHEN 'asr' THEN 3
               WHEN 'maghrib' THEN 4 WHEN 'isha' THEN 5 END",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, prayer, minutes_before, enabled, sound) = r?;
            result.push(Reminder {
                id,
                prayer: PrayerType::from_str(&prayer)?,
                minutes_before,
                enabled,
                sound: AlarmSound::from_str(&sound)?,
            });
        }
        Ok(result)
    }

    /// Update lead time (and optionally sound); re-enables the reminder.
    pub fn set(
        conn: &Connection,
        prayer: PrayerType,
        minutes_before: u32,
        sound: Option<AlarmSound>,
    ) -> Result<()> {
        if !prayer.is_salah() {
            return Err(anyhow!("Reminders are only kept for the five daily prayers"));
        }
        conn.execute(
            "INSERT INTO reminders (prayer, minutes_before, enabled, sound)
             VALUES (?1, ?2, 1, COALESCE(?3, 'beep'))
             ON CONFLICT(prayer) DO UPDATE SET
                minutes_before = ?2,
                enabled = 1,
                sound = COALESCE(?3, sound)",
            params![prayer.as_str(), minutes_before, sound.map(|s| s.as_str())],
        )?;
        Ok(())
    }

    pub fn set_enabled(conn: &Connection, prayer: PrayerType, enabled: bool) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE reminders SET enabled = ?1 WHERE prayer = ?2",
            params![enabled, prayer.as_str()],
        )?;
        Ok(changed > 0)
    }
}

// ─── Custom alarms ───────────────────────────────────────────────────────────

pub struct AlarmRepo;

impl AlarmRepo {
    pub fn list(conn: &Connection) -> Result<Vec<CustomAlarm>> {
        let mut stmt = conn.prepare(
            "SELECT id, label, anchor, offset_minutes, enabled, sound
             FROM custom_alarms ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)?,
                row.get::<_, bool>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, label, anchor, offset_minutes, enabled, sound) = r?;
            result.push(CustomAlarm {
                id,
                label,
                anchor: PrayerType::from_str(&anchor)?,
                offset_minutes,
                enabled,
                sound: AlarmSound::from_str(&sound)?,
            });
        }
        Ok(result)
    }

    pub fn add(
        conn: &Connection,
        label: &str,
        anchor: PrayerType,
        offset_minutes: i32,
        sound: AlarmSound,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO custom_alarms (label, anchor, offset_minutes, enabled, sound)
             VALUES (?1, ?2, ?3, 1, ?4)",
            params![label, anchor.as_str(), offset_minutes, sound.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn remove(conn: &Connection, id: i64) -> Result<bool> {
        let n = conn.execute("DELETE FROM custom_alarms WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// Flip the enabled flag; returns the new state, or None if no such alarm.
    pub fn toggle(conn: &Connection, id: i64) -> Result<Option<bool>> {
        let n = conn.execute(
            "UPDATE custom_alarms SET enabled = 1 - enabled WHERE id = ?1",
            params![id],
        )?;
        if n == 0 {
            return Ok(None);
        }
        let enabled: bool = conn.query_row(
            "SELECT enabled FROM custom_alarms WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(Some(enabled))
    }
}

// ─── Saved locations ─────────────────────────────────────────────────────────

pub struct LocationRepo;

impl LocationRepo {
    pub fn list(conn: &Connection) -> Result<Vec<SavedLocation>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, latitude, longitude, timezone_offset, city, country
             FROM saved_locations ORDER BY name COLLATE NOCASE",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SavedLocation {
                id: row.get(0)?,
                name: row.get(1)?,
                latitude: row.get(2)?,
                longitude: row.get(3)?,
                timezone_offset: row.get(4)?,
                city: row.get(5)?,
                country: row.get(6)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    /// Insert or overwrite by name.
    pub fn save(conn: &Connection, loc: &SavedLocation) -> Result<()> {
        conn.execute(
            "INSERT INTO saved_locations (name, latitude, longitude, timezone_offset, city, country)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(name) DO UPDATE SET
                latitude = ?2, longitude = ?3, timezone_offset = ?4, city = ?5, country = ?6",
            params![
                loc.name,
                loc.latitude,
                loc.longitude,
                loc.timezone_offset,
                loc.city,
                loc.country
            ],
        )?;
        Ok(())
    }

    pub fn find(conn: &Connection, name: &str) -> Result<Option<SavedLocation>> {
        let all = Self::list(conn)?;
        Ok(all
            .into_iter()
            .find(|l| l.name.to_lowercase() == name.to_lowercase()))
    }

    pub fn remove(conn: &Connection, name: &str) -> Result<bool> {
        let n = conn.execute(
            "DELETE FROM saved_locations WHERE name = ?1 COLLATE NOCASE",
            params![name],
        )?;
        Ok(n > 0)
    }
}

// ─── Search history ──────────────────────────────────────────────────────────

pub struct HistoryRepo;

impl HistoryRepo {
    /// Record a query as the most recent one, evicting beyond `HISTORY_LIMIT`.
    pub fn record(conn: &Connection, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        conn.execute("DELETE FROM search_history WHERE query = ?1", params![query])?;
        conn.execute(
            "INSERT INTO search_history (query) VALUES (?1)",
            params![query],
        )?;
        conn.execute(
            "DELETE FROM search_history WHERE id NOT IN
                (SELECT id FROM search_history ORDER BY id DESC LIMIT ?1)",
            params![HISTORY_LIMIT as i64],
        )?;
        Ok(())
    }

    pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<String>> {
        let mut stmt =
            conn.prepare("SELECT query FROM search_history ORDER BY id DESC LIMIT ?1")?;
        let rows = stmt.query_map(params![limit as i64], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM search_history", [])?;
        Ok(())
    }
}

// ─── Dua favorites ───────────────────────────────────────────────────────────

pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Returns true when the dua is now a favorite.
    pub fn toggle(conn: &Connection, dua_id: u32) -> Result<bool> {
        let removed = conn.execute(
            "DELETE FROM dua_favorites WHERE dua_id = ?1",
            params![dua_id],
        )?;
        if removed > 0 {
            return Ok(false);
        }
        conn.execute(
            "INSERT INTO dua_favorites (dua_id) VALUES (?1)",
            params![dua_id],
        )?;
        Ok(true)
    }

    pub fn list(conn: &Connection) -> Result<Vec<u32>> {
        let mut stmt = conn.prepare("SELECT dua_id FROM dua_favorites ORDER BY dua_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }
}

// ─── Surah text cache ────────────────────────────────────────────────────────

pub struct SurahCacheRepo;

impl SurahCacheRepo {
    pub fn get(conn: &Connection, surah: u16, edition: &str) -> Result<Option<SurahText>> {
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM surah_cache WHERE surah = ?1 AND edition = ?2",
                params![surah, edition],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(None),
            Some(json) => match serde_json::from_str(&json) {
                Ok(text) => Ok(Some(text)),
                Err(e) => {
                    log::warn!("Discarding unreadable cached surah {}: {}", surah, e);
                    Ok(None)
                }
            },
        }
    }

    pub fn store(conn: &Connection, text: &SurahText) -> Result<()> {
        let payload = serde_json::to_string(text)?;
        conn.execute(
            "INSERT OR REPLACE INTO surah_cache (surah, edition, payload) VALUES (?1, ?2, ?3)",
            params![text.surah, text.edition, payload],
        )?;
        Ok(())
    }
}

// ─── Bookmark ────────────────────────────────────────────────────────────────

pub struct BookmarkRepo;

impl BookmarkRepo {
    pub fn set(conn: &Connection, surah: u16, ayah: u16) -> Result<()> {
        conn.execute(
            "INSERT INTO bookmarks (id, surah, ayah, updated_at) VALUES (1, ?1, ?2, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET surah = ?1, ayah = ?2, updated_at = datetime('now')",
            params![surah, ayah],
        )?;
        Ok(())
    }

    pub fn get(conn: &Connection) -> Result<Option<Bookmark>> {
        conn.query_row(
            "SELECT surah, ayah, updated_at FROM bookmarks WHERE id = 1",
            [],
            |row| {
                Ok(Bookmark {
                    surah: row.get(0)?,
                    ayah: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(anyhow::Error::from)
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::Ayah;

    fn db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample_timings(date: NaiveDate) -> PrayerTimings {
        PrayerTimings {
            date,
            fajr: t(4, 51),
            sunrise: t(6, 9),
            zuhr: t(12, 22),
            asr: t(15, 44),
            maghrib: t(18, 35),
            isha: t(20, 5),
            source: TimingsSource::Online,
            hijri: Some("17 Rabi' al-Thani 1448".to_string()),
        }
    }

    #[test]
    fn timings_cache_is_keyed_by_location() {
        let conn = db();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let times = sample_timings(date);

        CacheRepo::store(&conn, "home", &times).unwrap();
        assert_eq!(CacheRepo::get(&conn, date, "home").unwrap(), Some(times));
        assert!(CacheRepo::get(&conn, date, "elsewhere").unwrap().is_none());

        CacheRepo::clear_all(&conn).unwrap();
        assert!(CacheRepo::get(&conn, date, "home").unwrap().is_none());
    }

    #[test]
    fn default_reminders_are_seeded() {
        let conn = db();
        let reminders = ReminderRepo::list(&conn).unwrap();
        let prayers: Vec<PrayerType> = reminders.iter().map(|r| r.prayer).collect();
        assert_eq!(prayers, PrayerType::salah());
        assert!(reminders.iter().all(|r| r.enabled && r.minutes_before == 10));
    }

    #[test]
    fn reminder_update_keeps_sound_unless_given() {
        let conn = db();
        ReminderRepo::set(&conn, PrayerType::Asr, 20, Some(AlarmSound::Adhan)).unwrap();
        ReminderRepo::set_enabled(&conn, PrayerType::Asr, false).unwrap();
        ReminderRepo::set(&conn, PrayerType::Asr, 25, None).unwrap();

        let asr = ReminderRepo::list(&conn)
            .unwrap()
            .into_iter()
            .find(|r| r.prayer == PrayerType::Asr)
            .unwrap();
        assert_eq!(asr.minutes_before, 25);
        assert_eq!(asr.sound, AlarmSound::Adhan);
        assert!(asr.enabled);

        assert!(ReminderRepo::set(&conn, PrayerType::Sunrise, 5, None).is_err());
    }

    #[test]
    fn alarm_lifecycle() {
        let conn = db();
        let id = AlarmRepo::add(&conn, "Tahajjud", PrayerType::Fajr, -60, AlarmSound::Chime)
            .unwrap();

        assert_eq!(AlarmRepo::toggle(&conn, id).unwrap(), Some(false));
        assert_eq!(AlarmRepo::toggle(&conn, id).unwrap(), Some(true));
        assert_eq!(AlarmRepo::toggle(&conn, id + 100).unwrap(), None);

        let alarms = AlarmRepo::list(&conn).unwrap();
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].offset_minutes, -60);

        assert!(AlarmRepo::remove(&conn, id).unwrap());
        assert!(!AlarmRepo::remove(&conn, id).unwrap());
    }

    #[test]
    fn locations_upsert_by_name() {
        let conn = db();
        let mut loc = SavedLocation {
            id: 0,
            name: "Home".to_string(),
            latitude: 51.5,
            longitude: -0.12,
            timezone_offset: 0,
            city: Some("London".to_string()),
            country: Some("UK".to_string()),
        };
        LocationRepo::save(&conn, &loc).unwrap();
        loc.timezone_offset = 60;
        LocationRepo::save(&conn, &loc).unwrap();

        let all = LocationRepo::list(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].timezone_offset, 60);
        assert!(LocationRepo::find(&conn, "home").unwrap().is_some());
        assert!(LocationRepo::remove(&conn, "HOME").unwrap());
        assert!(LocationRepo::list(&conn).unwrap().is_empty());
    }

    #[test]
    fn history_bumps_and_evicts() {
        let conn = db();
        for i in 0..HISTORY_LIMIT + 5 {
            HistoryRepo::record(&conn, &format!("q{}", i)).unwrap();
        }
        HistoryRepo::record(&conn, "q10").unwrap();
        HistoryRepo::record(&conn, "   ").unwrap();

        let recent = HistoryRepo::recent(&conn, 100).unwrap();
        assert_eq!(recent.len(), HISTORY_LIMIT);
        assert_eq!(recent[0], "q10");
        assert_eq!(recent[1], format!("q{}", HISTORY_LIMIT + 4));
        assert!(!recent.contains(&"q0".to_string()));

        HistoryRepo::clear(&conn).unwrap();
        assert!(HistoryRepo::recent(&conn, 5).unwrap().is_empty());
    }

    #[test]
    fn favorites_toggle() {
        let conn = db();
        assert!(FavoriteRepo::toggle(&conn, 7).unwrap());
        assert!(FavoriteRepo::toggle(&conn, 3).unwrap());
        assert_eq!(FavoriteRepo::list(&conn).unwrap(), vec![3, 7]);
        assert!(!FavoriteRepo::toggle(&conn, 7).unwrap());
        assert_eq!(FavoriteRepo::list(&conn).unwrap(), vec![3]);
    }

    #[test]
    fn surah_text_cache_and_bookmark() {
        let conn = db();
        let text = SurahText {
            surah: 112,
            edition: "en.asad".to_string(),
            ayahs: vec![Ayah {
                number_global: 6222,
                number_in_surah: 1,
                text_ar: "قُلْ هُوَ ٱللَّهُ أَحَدٌ".to_string(),
                text_translation: Some("SAY: He is the One God".to_string()),
                juz: 30,
                page: 604,
            }],
        };
        SurahCacheRepo::store(&conn, &text).unwrap();
        assert_eq!(SurahCacheRepo::get(&conn, 112, "en.asad").unwrap(), Some(text));
        assert!(SurahCacheRepo::get(&conn, 112, "en.sahih").unwrap().is_none());

        assert!(BookmarkRepo::get(&conn).unwrap().is_none());
        BookmarkRepo::set(&conn, 18, 10).unwrap();
        BookmarkRepo::set(&conn, 18, 45).unwrap();
        let mark = BookmarkRepo::get(&conn).unwrap().unwrap();
        assert_eq!((mark.surah, mark.ayah), (18, 45));
    }

    #[test]
    fn meta_roundtrip() {
        let conn = db();
        assert!(MetaRepo::get(&conn, "setup_done").unwrap().is_none());
        MetaRepo::set(&conn, "setup_done", "1").unwrap();
        assert_eq!(MetaRepo::get(&conn, "setup_done").unwrap().as_deref(), Some("1"));
    }
}
