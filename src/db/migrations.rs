use anyhow::Result;
use rusqlite::Connection;

use crate::models::PrayerType;

/// Lead time of the reminders seeded on first run.
pub const DEFAULT_REMINDER_MINUTES: u32 = 10;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS prayer_times_cache (
            date          TEXT NOT NULL,
            location_key  TEXT NOT NULL,
            fajr          TEXT NOT NULL,
            sunrise       TEXT NOT NULL,
            zuhr          TEXT NOT NULL,
            asr           TEXT NOT NULL,
            maghrib       TEXT NOT NULL,
            isha          TEXT NOT NULL,
            source        TEXT NOT NULL CHECK(source IN ('online','offline')),
            hijri         TEXT,
            PRIMARY KEY (date, location_key)
        );

        CREATE TABLE IF NOT EXISTS reminders (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            prayer          TEXT NOT NULL UNIQUE
                            CHECK(prayer IN ('fajr','zuhr','asr','maghrib','isha')),
            minutes_before  INTEGER NOT NULL DEFAULT 10,
            enabled         INTEGER NOT NULL DEFAULT 1,
            sound           TEXT NOT NULL DEFAULT 'beep'
                            CHECK(sound IN ('adhan','beep','chime','silent'))
        );

        CREATE TABLE IF NOT EXISTS custom_alarms (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            label           TEXT NOT NULL,
            anchor          TEXT NOT NULL
                            CHECK(anchor IN ('fajr','sunrise','zuhr','asr','maghrib','isha')),
            offset_minutes  INTEGER NOT NULL DEFAULT 0,
            enabled         INTEGER NOT NULL DEFAULT 1,
            sound           TEXT NOT NULL DEFAULT 'beep'
                            CHECK(sound IN ('adhan','beep','chime','silent'))
        );

        CREATE TABLE IF NOT EXISTS saved_locations (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            name             TEXT NOT NULL UNIQUE,
            latitude         REAL NOT NULL,
            longitude        REAL NOT NULL,
            timezone_offset  INTEGER NOT NULL,
            city             TEXT,
            country          TEXT
        );

        CREATE TABLE IF NOT EXISTS search_history (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            query        TEXT NOT NULL UNIQUE,
            searched_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS dua_favorites (
            dua_id  INTEGER PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS surah_cache (
            surah       INTEGER NOT NULL,
            edition     TEXT NOT NULL,
            payload     TEXT NOT NULL,
            fetched_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (surah, edition)
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id          INTEGER PRIMARY KEY CHECK(id = 1),
            surah       INTEGER NOT NULL,
            ayah        INTEGER NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;

    seed_reminders(conn)?;
    Ok(())
}

fn seed_reminders(conn: &Connection) -> Result<()> {
    for prayer in PrayerType::salah() {
        conn.execute(
            "INSERT OR IGNORE INTO reminders (prayer, minutes_before, enabled, sound)
             VALUES (?1, ?2, 1, 'beep')",
            rusqlite::params![prayer.as_str(), DEFAULT_REMINDER_MINUTES],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 5);
    }
}
