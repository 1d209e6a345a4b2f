use anyhow::{anyhow, Result};
use chrono::{FixedOffset, NaiveDate, NaiveTime, Timelike};
use salah::prelude::*;

use crate::config::settings::LocationConfig;
use crate::models::{PrayerTimings, TimingsSource};

/// Offline astronomical calculator; the fallback when Aladhan is unreachable.
#[derive(Debug, Clone)]
pub struct PrayerCalculator {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: i32,
}

impl PrayerCalculator {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(anyhow!("Coordinates out of range: {}, {}", lat, lng));
        }
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    pub fn from_location(loc: &LocationConfig) -> Result<Self> {
        Self::new(
            loc.latitude,
            loc.longitude,
            &loc.calc_method,
            &loc.madhab,
            loc.timezone_offset,
        )
    }

    pub fn compute(&self, date: NaiveDate) -> Result<PrayerTimings> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;

        // Stored at minute precision, same as the API
        let to_local = |utc: chrono::DateTime<chrono::Utc>| -> NaiveTime {
            let t = utc.with_timezone(&offset).time();
            t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
        };

        Ok(PrayerTimings {
            date,
            fajr: to_local(times.time(Prayer::Fajr)),
            sunrise: to_local(times.time(Prayer::Sunrise)),
            zuhr: to_local(times.time(Prayer::Dhuhr)),
            asr: to_local(times.time(Prayer::Asr)),
            maghrib: to_local(times.time(Prayer::Maghrib)),
            isha: to_local(times.time(Prayer::Isha)),
            source: TimingsSource::Offline,
            hijri: None,
        })
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_method_and_madhab() {
        assert!(PrayerCalculator::new(21.4, 39.8, "Lunar", "Shafi", 180).is_err());
        assert!(PrayerCalculator::new(21.4, 39.8, "UmmAlQura", "Maliki", 180).is_err());
        assert!(PrayerCalculator::new(95.0, 39.8, "UmmAlQura", "Shafi", 180).is_err());
    }

    #[test]
    fn offline_times_are_ordered() {
        let calc = PrayerCalculator::new(21.4225, 39.8262, "UmmAlQura", "Shafi", 180).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let t = calc.compute(date).unwrap();

        assert_eq!(t.source, TimingsSource::Offline);
        assert!(t.fajr < t.sunrise);
        assert!(t.sunrise < t.zuhr);
        assert!(t.zuhr < t.asr);
        assert!(t.asr < t.maghrib);
        assert!(t.maghrib < t.isha);
    }

    #[test]
    fn hanafi_asr_is_later() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let shafi = PrayerCalculator::new(33.69, 73.06, "Karachi", "Shafi", 300)
            .unwrap()
            .compute(date)
            .unwrap();
        let hanafi = PrayerCalculator::new(33.69, 73.06, "Karachi", "Hanafi", 300)
            .unwrap()
            .compute(date)
            .unwrap();
        assert!(hanafi.asr > shafi.asr);
        assert_eq!(hanafi.fajr, shafi.fajr);
    }
}
