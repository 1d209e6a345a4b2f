use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{info, warn};
use rusqlite::Connection;

use crate::api::aladhan::{self, AladhanApi};
use crate::api::{ApiError, HttpClient};
use crate::config::settings::{AppConfig, LocationConfig};
use crate::db::repository::CacheRepo;
use crate::models::{PrayerTimings, PrayerType};
use crate::prayer_times::calculator::PrayerCalculator;

/// Anything that can produce timings over the network.
pub trait OnlineTimings {
    fn fetch(&self, date: NaiveDate, location: &LocationConfig) -> Result<PrayerTimings, ApiError>;
}

pub struct AladhanSource {
    client: HttpClient,
    base: String,
}

impl AladhanSource {
    pub fn new(client: HttpClient, base: &str) -> Self {
        Self {
            client,
            base: base.to_string(),
        }
    }
}

impl OnlineTimings for AladhanSource {
    fn fetch(&self, date: NaiveDate, loc: &LocationConfig) -> Result<PrayerTimings, ApiError> {
        let method = aladhan::method_id(&loc.calc_method).ok_or_else(|| {
            ApiError::Payload(format!("no Aladhan method for '{}'", loc.calc_method))
        })?;
        let school = aladhan::school(&loc.madhab);
        let api = AladhanApi::new(&self.client, &self.base);
        match (&loc.city, &loc.country) {
            (Some(city), Some(country)) => api.timings_by_city(date, city, country, method, school),
            _ => api.timings_by_coords(date, loc.latitude, loc.longitude, method, school),
        }
    }
}

/// Resolves timings for a date: cache, then Aladhan, then the offline calculator.
pub struct TimingsProvider {
    location: LocationConfig,
    calc: PrayerCalculator,
    online: Option<Box<dyn OnlineTimings>>,
    /// False when the looked-up place is not at the configured coordinates.
    offline_fallback: bool,
}

impl TimingsProvider {
    pub fn new(location: LocationConfig, online: Option<Box<dyn OnlineTimings>>) -> Result<Self> {
        let calc = PrayerCalculator::from_location(&location)?;
        Ok(Self {
            location,
            calc,
            online,
            offline_fallback: true,
        })
    }

    /// Timings for a city other than the configured one. Only Aladhan knows
    /// where it is, so failures are errors rather than offline guesses.
    pub fn for_city(config: &AppConfig, city: &str, country: &str) -> Result<Self> {
        if !config.api.online {
            bail!("City lookups need online mode ([api] online = true)");
        }
        let mut lookup = config.clone();
        lookup.location.city = Some(city.to_string());
        lookup.location.country = Some(country.to_string());
        lookup.location.name = format!("{}, {}", city, country);
        Ok(Self::from_config(&lookup)?.online_only())
    }

    pub fn online_only(mut self) -> Self {
        self.offline_fallback = false;
        self
    }

    /// Provider wired to the configured API, unless online lookups are off.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let online: Option<Box<dyn OnlineTimings>> = if config.api.online {
            let client = HttpClient::from_config(&config.api).context("Building HTTP client")?;
            Some(Box::new(AladhanSource::new(client, &config.api.aladhan_url)))
        } else {
            None
        };
        Self::new(config.location.clone(), online)
    }

    pub fn offline(location: LocationConfig) -> Result<Self> {
        Self::new(location, None)
    }

    pub fn location(&self) -> &LocationConfig {
        &self.location
    }

    fn cache_key(&self) -> String {
        match (&self.location.city, &self.location.country) {
            (Some(city), Some(country)) => format!("{}|{}|{}", self.location.cache_key(), city, country),
            _ => self.location.cache_key(),
        }
    }

    pub fn timings(&self, conn: &Connection, date: NaiveDate) -> Result<PrayerTimings> {
        let key = self.cache_key();
        if let Some(cached) = CacheRepo::get(conn, date, &key)? {
            return Ok(cached);
        }

        let times = match &self.online {
            Some(source) => match source.fetch(date, &self.location) {
                Ok(t) => {
                    info!("Fetched prayer times for {} from Aladhan", date);
                    t
                }
                Err(e) if !self.offline_fallback => {
                    let reason = if e.is_transient() {
                        format!("Aladhan is unreachable; no offline times for {}", self.location.name)
                    } else {
                        format!("Aladhan could not resolve {}", self.location.name)
                    };
                    return Err(anyhow::Error::new(e).context(reason));
                }
                Err(e) => {
                    warn!("Aladhan lookup failed ({}); using offline calculation", e);
                    self.calc.compute(date)?
                }
            },
            None if !self.offline_fallback => {
                bail!("No offline times for {}; enable online lookups", self.location.name)
            }
            None => self.calc.compute(date)?,
        };

        CacheRepo::store(conn, &key, &times)?;
        Ok(times)
    }

    /// Precompute a window of days offline, without touching the network.
    pub fn ensure_cached(&self, conn: &Connection, from: NaiveDate, days_ahead: u32) -> Result<()> {
        if !self.offline_fallback {
            bail!("No offline times for {}", self.location.name);
        }
        let key = self.cache_key();
        for i in 0..=(days_ahead as i64) {
            let date = from + Duration::days(i);
            if CacheRepo::get(conn, date, &key)?.is_none() {
                CacheRepo::store(conn, &key, &self.calc.compute(date)?)?;
            }
        }
        Ok(())
    }

    /// Next obligatory prayer after `now` and the seconds until it.
    pub fn next_prayer(&self, conn: &Connection, now: NaiveDateTime) -> Result<(PrayerType, i64)> {
        let today = self.timings(conn, now.date())?;
        if let Some(next) = next_prayer_today(&today, now) {
            return Ok(next);
        }
        let tomorrow = now.date().succ_opt().unwrap_or(now.date());
        let fajr = tomorrow.and_time(self.timings(conn, tomorrow)?.fajr);
        Ok((PrayerType::Fajr, (fajr - now).num_seconds()))
    }
}

pub fn next_prayer_today(times: &PrayerTimings, now: NaiveDateTime) -> Option<(PrayerType, i64)> {
    PrayerType::salah()
        .into_iter()
        .map(|p| (p, times.date.and_time(times.time_of(p))))
        .find(|(_, at)| *at > now)
        .map(|(p, at)| (p, (at - now).num_seconds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::TimingsSource;
    use chrono::NaiveTime;
    use std::cell::Cell;

    struct Failing;

    impl OnlineTimings for Failing {
        fn fetch(&self, _: NaiveDate, _: &LocationConfig) -> Result<PrayerTimings, ApiError> {
            Err(ApiError::Status {
                url: "https://api.aladhan.com/v1/timings".to_string(),
                code: 502,
            })
        }
    }

    struct Fixed {
        calls: std::rc::Rc<Cell<u32>>,
    }

    impl OnlineTimings for Fixed {
        fn fetch(&self, date: NaiveDate, _: &LocationConfig) -> Result<PrayerTimings, ApiError> {
            self.calls.set(self.calls.get() + 1);
            let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
            Ok(PrayerTimings {
                date,
                fajr: t(5, 0),
                sunrise: t(6, 20),
                zuhr: t(12, 0),
                asr: t(15, 30),
                maghrib: t(18, 0),
                isha: t(19, 30),
                source: TimingsSource::Online,
                hijri: None,
            })
        }
    }

    fn db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn api_failure_falls_back_to_offline() {
        let conn = db();
        let provider =
            TimingsProvider::new(LocationConfig::default(), Some(Box::new(Failing))).unwrap();
        let times = provider.timings(&conn, date()).unwrap();
        assert_eq!(times.source, TimingsSource::Offline);
    }

    #[test]
    fn city_lookup_failure_is_not_guessed_or_cached() {
        let conn = db();
        let mut tokyo = LocationConfig::default();
        tokyo.city = Some("Tokyo".to_string());
        tokyo.country = Some("Japan".to_string());
        let provider = TimingsProvider::new(tokyo, Some(Box::new(Failing)))
            .unwrap()
            .online_only();

        let err = provider.timings(&conn, date()).unwrap_err();
        assert!(err.to_string().contains("unreachable"));
        assert!(CacheRepo::get(&conn, date(), &provider.cache_key()).unwrap().is_none());
        assert!(provider.ensure_cached(&conn, date(), 1).is_err());
    }

    #[test]
    fn city_lookup_uses_online_result() {
        let conn = db();
        let mut tokyo = LocationConfig::default();
        tokyo.city = Some("Tokyo".to_string());
        tokyo.country = Some("Japan".to_string());
        let provider = TimingsProvider::new(
            tokyo,
            Some(Box::new(Fixed {
                calls: std::rc::Rc::new(Cell::new(0)),
            })),
        )
        .unwrap()
        .online_only();

        let times = provider.timings(&conn, date()).unwrap();
        assert_eq!(times.source, TimingsSource::Online);
        assert!(CacheRepo::get(&conn, date(), &provider.cache_key()).unwrap().is_some());
    }

    #[test]
    fn city_lookup_requires_online_mode() {
        let mut config = AppConfig::default();
        config.api.online = false;
        assert!(TimingsProvider::for_city(&config, "Tokyo", "Japan").is_err());
    }

    #[test]
    fn online_result_is_cached() {
        let conn = db();
        let calls = std::rc::Rc::new(Cell::new(0));
        let provider = TimingsProvider::new(
            LocationConfig::default(),
            Some(Box::new(Fixed { calls: calls.clone() })),
        )
        .unwrap();

        let first = provider.timings(&conn, date()).unwrap();
        let second = provider.timings(&conn, date()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.source, TimingsSource::Online);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn next_prayer_rolls_over_to_tomorrow_fajr() {
        let conn = db();
        let provider = TimingsProvider::new(
            LocationConfig::default(),
            Some(Box::new(Fixed {
                calls: std::rc::Rc::new(Cell::new(0)),
            })),
        )
        .unwrap();

        let afternoon = date().and_hms_opt(13, 0, 0).unwrap();
        assert_eq!(
            provider.next_prayer(&conn, afternoon).unwrap(),
            (PrayerType::Asr, 2 * 3600 + 30 * 60)
        );

        let late = date().and_hms_opt(23, 0, 0).unwrap();
        assert_eq!(
            provider.next_prayer(&conn, late).unwrap(),
            (PrayerType::Fajr, 6 * 3600)
        );
    }

    #[test]
    fn ensure_cached_fills_window_offline() {
        let conn = db();
        let provider = TimingsProvider::offline(LocationConfig::default()).unwrap();
        provider.ensure_cached(&conn, date(), 3).unwrap();
        let key = provider.cache_key();
        for i in 0..=3 {
            let d = date() + Duration::days(i);
            assert!(CacheRepo::get(&conn, d, &key).unwrap().is_some());
        }
    }
}
