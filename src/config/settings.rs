use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_latitude() -> f64 {
    21.4225
}
fn default_longitude() -> f64 {
    39.8262
}
fn default_location_name() -> String {
    "Makkah".to_string()
}
fn default_calc_method() -> String {
    "UmmAlQura".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_timezone_offset() -> i32 {
    180
}
fn default_translation() -> String {
    "en.asad".to_string()
}
fn default_reciter() -> String {
    "ar.alafasy".to_string()
}
fn default_bitrate() -> u32 {
    128
}
fn default_player() -> String {
    "mpv".to_string()
}
fn default_player_args() -> Vec<String> {
    vec!["--no-video".to_string(), "--really-quiet".to_string()]
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_window_secs() -> i64 {
    60
}
fn default_aladhan_url() -> String {
    "https://api.aladhan.com/v1".to_string()
}
fn default_quran_url() -> String {
    "https://api.alquran.cloud/v1".to_string()
}
fn default_audio_cdn_url() -> String {
    "https://cdn.islamic.network".to_string()
}
fn default_radio_url() -> String {
    "https://mp3quran.net/api/v3".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// When both are set, online lookups go by city instead of coordinates
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
    /// Days added to the computed Hijri date for local moon sighting.
    #[serde(default)]
    pub hijri_offset: i32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            city: None,
            country: None,
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: 0,
        }
    }
}

impl LocationConfig {
    /// Cache key for stored timings; changes whenever the computed times would.
    pub fn cache_key(&self) -> String {
        format!(
            "{:.4},{:.4}|{}|{}|{}",
            self.latitude, self.longitude, self.calc_method, self.madhab, self.timezone_offset
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuranConfig {
    #[serde(default = "default_translation")]
    pub translation: String,
    #[serde(default = "default_reciter")]
    pub reciter: String,
    #[serde(default = "default_bitrate")]
    pub bitrate: u32,
}

impl Default for QuranConfig {
    fn default() -> Self {
        Self {
            translation: default_translation(),
            reciter: default_reciter(),
            bitrate: default_bitrate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_player")]
    pub player: String,
    #[serde(default = "default_player_args")]
    pub player_args: Vec<String>,
    /// File path or URL played for adhan-sound reminders
    #[serde(default)]
    pub adhan_source: Option<String>,
    #[serde(default)]
    pub chime_source: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            player_args: default_player_args(),
            adhan_source: None,
            chime_source: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_window_secs")]
    pub window_secs: i64,
    #[serde(default = "default_true")]
    pub bell: bool,
}

impl ReminderConfig {
    /// Poll period for `watch` and the TUI tick, never below 100 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            window_secs: default_window_secs(),
            bell: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// When false, prayer times come only from the offline calculator
    #[serde(default = "default_true")]
    pub online: bool,
    #[serde(default = "default_aladhan_url")]
    pub aladhan_url: String,
    #[serde(default = "default_quran_url")]
    pub quran_url: String,
    #[serde(default = "default_audio_cdn_url")]
    pub audio_cdn_url: String,
    #[serde(default = "default_radio_url")]
    pub radio_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            online: true,
            aladhan_url: default_aladhan_url(),
            quran_url: default_quran_url(),
            audio_cdn_url: default_audio_cdn_url(),
            radio_url: default_radio_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub quran: QuranConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "tilawah").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("tilawah.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.location.name, "Makkah");
        assert_eq!(config.ui.theme, ThemeMode::Dark);
        assert!(config.api.online);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[location]\nname = \"Cairo\"\n\n[ui]\ntheme = \"light\"\n")
            .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.location.name, "Cairo");
        assert_eq!(config.location.calc_method, "UmmAlQura");
        assert_eq!(config.ui.theme, ThemeMode::Light);
        assert_eq!(config.reminders.window_secs, 60);
    }

    #[test]
    fn theme_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.ui.theme = config.ui.theme.toggled();
        config.location.city = Some("Istanbul".to_string());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.ui.theme, ThemeMode::Light);
        assert_eq!(loaded.location.city.as_deref(), Some("Istanbul"));
        assert_eq!(loaded.ui.theme.toggled(), ThemeMode::Dark);
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let mut reminders = ReminderConfig::default();
        assert_eq!(reminders.poll_interval(), Duration::from_millis(1000));
        reminders.poll_interval_ms = 250;
        assert_eq!(reminders.poll_interval(), Duration::from_millis(250));
        reminders.poll_interval_ms = 0;
        assert_eq!(reminders.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn cache_key_tracks_method_changes() {
        let mut loc = LocationConfig::default();
        let before = loc.cache_key();
        loc.calc_method = "Egyptian".to_string();
        assert_ne!(before, loc.cache_key());
    }
}
