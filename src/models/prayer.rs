use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerType {
    Fajr,
    Sunrise,
    Zuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerType {
    /// The five obligatory prayers, in daily order.
    pub fn salah() -> Vec<PrayerType> {
        vec![
            PrayerType::Fajr,
            PrayerType::Zuhr,
            PrayerType::Asr,
            PrayerType::Maghrib,
            PrayerType::Isha,
        ]
    }

    pub fn all() -> Vec<PrayerType> {
        vec![
            PrayerType::Fajr,
            PrayerType::Sunrise,
            PrayerType::Zuhr,
            PrayerType::Asr,
            PrayerType::Maghrib,
            PrayerType::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "fajr",
            PrayerType::Sunrise => "sunrise",
            PrayerType::Zuhr => "zuhr",
            PrayerType::Asr => "asr",
            PrayerType::Maghrib => "maghrib",
            PrayerType::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Fajr",
            PrayerType::Sunrise => "Sunrise",
            PrayerType::Zuhr => "Zuhr",
            PrayerType::Asr => "Asr",
            PrayerType::Maghrib => "Maghrib",
            PrayerType::Isha => "Isha",
        }
    }

    pub fn is_salah(&self) -> bool {
        !matches!(self, PrayerType::Sunrise)
    }
}

impl std::fmt::Display for PrayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerType::Fajr),
            "sunrise" | "shuruq" => Ok(PrayerType::Sunrise),
            "zuhr" | "dhuhr" | "dhuhur" => Ok(PrayerType::Zuhr),
            "asr" => Ok(PrayerType::Asr),
            "maghrib" => Ok(PrayerType::Maghrib),
            "isha" => Ok(PrayerType::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingsSource {
    Online,
    Offline,
}

impl TimingsSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimingsSource::Online => "online",
            TimingsSource::Offline => "offline",
        }
    }
}

impl FromStr for TimingsSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(TimingsSource::Online),
            "offline" => Ok(TimingsSource::Offline),
            _ => Err(anyhow::anyhow!("Unknown timings source: {}", s)),
        }
    }
}

/// Prayer times for one date at one location, in local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimings {
    pub date: NaiveDate,
    pub fajr: NaiveTime,
    pub sunrise: NaiveTime,
    pub zuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
    pub source: TimingsSource,
    /// Hijri label reported by the API, when fetched online
    pub hijri: Option<String>,
}

impl PrayerTimings {
    pub fn time_of(&self, prayer: PrayerType) -> NaiveTime {
        match prayer {
            PrayerType::Fajr => self.fajr,
            PrayerType::Sunrise => self.sunrise,
            PrayerType::Zuhr => self.zuhr,
            PrayerType::Asr => self.asr,
            PrayerType::Maghrib => self.maghrib,
            PrayerType::Isha => self.isha,
        }
    }

    pub fn as_list(&self) -> Vec<(PrayerType, NaiveTime)> {
        PrayerType::all()
            .into_iter()
            .map(|p| (p, self.time_of(p)))
            .collect()
    }
}
