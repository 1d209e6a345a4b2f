use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use rusqlite::Connection;
use std::str::FromStr;

use crate::api::alquran::{self, AlQuranApi};
use crate::api::{radio, HttpClient};
use crate::audio::AudioPlayer;
use crate::cli::args::{
    AlarmCommands, DuaCommands, LocationCommands, RadioCommands, ReminderCommands,
    SurahCommands, TimesArgs,
};
use crate::config::{AppConfig, ThemeMode};
use crate::data::{duas, surahs};
use crate::db::repository::{
    AlarmRepo, BookmarkRepo, FavoriteRepo, HistoryRepo, LocationRepo, MetaRepo, ReminderRepo,
    HISTORY_LIMIT,
};
use crate::models::reminder::{validate_alarm_offset, validate_reminder_minutes};
use crate::models::surah::validate_ayah_range;
use crate::models::{AlarmSound, DuaCategory, PrayerType, RevelationType, SavedLocation, Surah};
use crate::prayer_times::TimingsProvider;
use crate::reminders::{self, SoundCue, TerminalNotifier};
use crate::utils::format::{fit_width, format_duration_secs, format_time, format_tz_offset};
use crate::utils::hijri::hijri_label;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn parse_prayer(s: &str) -> Result<PrayerType> {
    PrayerType::from_str(s)
        .map_err(|_| anyhow!("Unknown prayer '{}'. Use: fajr, zuhr, asr, maghrib, isha", s))
}

fn parse_sound(s: &str) -> Result<AlarmSound> {
    AlarmSound::from_str(s).map_err(|_| anyhow!("Unknown sound '{}'. Use: adhan, beep, chime, silent", s))
}

fn http_client(config: &AppConfig) -> Result<Option<HttpClient>> {
    if !config.api.online {
        return Ok(None);
    }
    Ok(Some(HttpClient::from_config(&config.api).context("Building HTTP client")?))
}

// ─── Setup wizard ────────────────────────────────────────────────────────────

pub fn handle_setup(conn: &Connection, config: &mut AppConfig, reset: bool) -> Result<()> {
    if !reset && MetaRepo::get(conn, "setup_done")?.as_deref() == Some("1") {
        println!("Tilawah is already configured. Use --reset to reconfigure.");
        return Ok(());
    }
    crate::cli::setup_tui::run_setup_tui(conn, config)
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(conn: &Connection, config: &AppConfig, args: &TimesArgs) -> Result<()> {
    let now = Local::now().naive_local();
    let date = args.date.unwrap_or(now.date());

    let mut lookup = config.clone();
    if args.offline {
        lookup.api.online = false;
    }

    let provider = match (&args.city, &args.country) {
        (Some(city), Some(country)) => TimingsProvider::for_city(&lookup, city, country)?,
        _ if lookup.api.online => TimingsProvider::from_config(&lookup)?,
        _ => TimingsProvider::offline(lookup.location.clone())?,
    };
    lookup.location = provider.location().clone();
    let times = provider.timings(conn, date)?;
    let reminders = ReminderRepo::list(conn)?;

    println!();
    println_colored!(GOLD, "  Prayer Times · {} ({})", lookup.location.name, date.format("%a %d %b %Y"));
    println_colored!(
        DIM,
        "  {} · {} · {}",
        hijri_label(date, lookup.location.hijri_offset, times.hijri.as_deref()),
        format_tz_offset(lookup.location.timezone_offset),
        times.source.as_str()
    );
    println!();

    for (prayer, time) in times.as_list() {
        let marker = reminders
            .iter()
            .find(|r| r.prayer == prayer && r.enabled)
            .map(|r| format!("  🔔 -{}m", r.minutes_before))
            .unwrap_or_default();
        let line = format!("  {}  {}{}", fit_width(prayer.display_name(), 10), format_time(time), marker);
        if date == now.date() && date.and_time(time) < now {
            println_colored!(DIM, "{}", line);
        } else {
            println_colored!(BOLD, "{}", line);
        }
    }

    if date == now.date() {
        let (next, secs) = provider.next_prayer(conn, now)?;
        println!();
        println_colored!(AMBER, "  Next: {} in {}", next.display_name(), format_duration_secs(secs));
    }
    println!();
    Ok(())
}

// ─── Surahs ──────────────────────────────────────────────────────────────────

pub fn handle_surah(conn: &Connection, config: &AppConfig, action: &SurahCommands) -> Result<()> {
    match action {
        SurahCommands::List { meccan, medinan } => {
            let list = if *meccan {
                surahs::filter_by_revelation(RevelationType::Meccan)
            } else if *medinan {
                surahs::filter_by_revelation(RevelationType::Medinan)
            } else {
                surahs::SURAHS.iter().collect()
            };
            println!();
            for s in &list {
                print_surah_row(s);
            }
            println!();
            println_colored!(DIM, "  {} surahs", list.len());
        }
        SurahCommands::Search { query } => {
            HistoryRepo::record(conn, query)?;
            let found = surahs::search(query);
            println!();
            if found.is_empty() {
                println_colored!(AMBER, "  No surah matches '{}'", query.trim());
            }
            for s in &found {
                print_surah_row(s);
            }
            println!();
        }
        SurahCommands::Read { number, from, to, translation } => {
            let surah = surahs::surah(*number)
                .ok_or_else(|| anyhow!("Surah number must be between 1 and {}", surahs::SURAH_COUNT))?;
            validate_ayah_range(*from, *to)?;
            let edition = translation.as_deref().unwrap_or(&config.quran.translation);
            let client = http_client(config)?;
            let api = client.as_ref().map(|c| AlQuranApi::new(c, &config.api.quran_url));
            let text = alquran::load_surah(conn, api.as_ref(), *number, edition)?;

            let ayahs = text.range(*from, *to)?;
            println!();
            println_colored!(GOLD, "  {}. {} · {} ({})", surah.number, surah.name_en, surah.name_ar, surah.translation_en);
            println_colored!(DIM, "  {} · {} ayahs · {}", surah.revelation.display_name(), surah.verses, edition);
            println!();
            for ayah in ayahs {
                println_colored!(BOLD, "  ﴿{}﴾ {}", ayah.number_in_surah, ayah.text_ar);
                if let Some(tr) = &ayah.text_translation {
                    println_colored!(DIM, "      {}", tr);
                }
                println!();
            }
            if let Some(last) = ayahs.last() {
                BookmarkRepo::set(conn, surah.number, last.number_in_surah)?;
            }
        }
        SurahCommands::Play { number, ayah } => {
            let surah = surahs::surah(*number)
                .ok_or_else(|| anyhow!("Surah number must be between 1 and {}", surahs::SURAH_COUNT))?;
            let q = &config.quran;
            let (url, title) = match ayah {
                Some(a) => {
                    if *a == 0 || *a > surah.verses {
                        bail!("{} has {} ayahs", surah.name_en, surah.verses);
                    }
                    let first = surahs::first_global_ayah(surah.number)
                        .ok_or_else(|| anyhow!("Unknown surah {}", surah.number))?;
                    let global = first + *a as u32 - 1;
                    (
                        alquran::ayah_audio_url(&config.api.audio_cdn_url, &q.reciter, global, q.bitrate),
                        format!("{} {}:{}", surah.name_en, surah.number, a),
                    )
                }
                None => (
                    alquran::surah_audio_url(&config.api.audio_cdn_url, &q.reciter, surah.number, q.bitrate),
                    surah.name_en.to_string(),
                ),
            };
            let mut player = AudioPlayer::from_config(&config.audio);
            player.play(&url, &title)?;
            println_colored!(GREEN, "  ▶ {} · {}", title, q.reciter);
            println_colored!(DIM, "  Ctrl-C to stop");
            player.wait()?;
        }
    }
    Ok(())
}

fn print_surah_row(s: &Surah) {
    println!(
        "  {:>3}  {}{}  {}{}\x1b[0m  {}{:>3} ayahs · {}\x1b[0m",
        s.number,
        BOLD,
        fit_width(s.name_en, 16),
        DIM,
        fit_width(s.translation_en, 26),
        DIM,
        s.verses,
        s.revelation.display_name()
    );
}

// ─── Duas ────────────────────────────────────────────────────────────────────

pub fn handle_dua(conn: &Connection, action: &DuaCommands) -> Result<()> {
    match action {
        DuaCommands::Categories => {
            println!();
            for (category, count) in duas::categories() {
                println!("  {:<12} {}", category.as_str(), count);
            }
            println!();
        }
        DuaCommands::List { category, favorites } => {
            let favs = FavoriteRepo::list(conn)?;
            let list: Vec<_> = match category {
                Some(c) => {
                    let cat = DuaCategory::from_str(c)?;
                    duas::by_category(cat)
                }
                None => duas::DUAS.iter().collect(),
            };
            println!();
            let mut shown = 0;
            for dua in list.into_iter().filter(|d| !*favorites || favs.contains(&d.id)) {
                let star = if favs.contains(&dua.id) { "★" } else { " " };
                println!(
                    "  {}{}\x1b[0m {:>3}  {}  {}{}\x1b[0m",
                    GOLD,
                    star,
                    dua.id,
                    fit_width(dua.title, 36),
                    DIM,
                    dua.category.display_name()
                );
                shown += 1;
            }
            if shown == 0 {
                println_colored!(DIM, "  Nothing here yet");
            }
            println!();
        }
        DuaCommands::Show { id } => {
            let dua = duas::find(*id).ok_or_else(|| anyhow!("No dua with id {}", id))?;
            println!();
            println_colored!(GOLD, "  {}", dua.title);
            println_colored!(DIM, "  {}", dua.category.display_name());
            println!();
            println_colored!(BOLD, "  {}", dua.arabic);
            println!();
            println!("  {}", dua.transliteration);
            println!();
            println!("  {}", dua.translation);
            if let Some(reference) = dua.reference {
                println!();
                println_colored!(DIM, "  {}", reference);
            }
            println!();
        }
        DuaCommands::Fav { id } => {
            let dua = duas::find(*id).ok_or_else(|| anyhow!("No dua with id {}", id))?;
            if FavoriteRepo::toggle(conn, dua.id)? {
                println_colored!(GREEN, "  ★ {} added to favorites", dua.title);
            } else {
                println_colored!(DIM, "  ☆ {} removed from favorites", dua.title);
            }
        }
    }
    Ok(())
}

// ─── Reminders & alarms ──────────────────────────────────────────────────────

pub fn handle_reminder(conn: &Connection, action: &ReminderCommands) -> Result<()> {
    match action {
        ReminderCommands::List => {
            println!();
            println_colored!(GOLD, "  Reminders");
            println!();
            for r in ReminderRepo::list(conn)? {
                let line = format!(
                    "  {}  {:>3} min before  {}",
                    fit_width(r.prayer.display_name(), 8),
                    r.minutes_before,
                    r.sound.as_str()
                );
                if r.enabled {
                    println!("{}", line);
                } else {
                    println_colored!(DIM, "{}  (off)", line);
                }
            }
            println!();
        }
        ReminderCommands::Set { prayer, minutes, sound } => {
            let prayer = parse_prayer(prayer)?;
            validate_reminder_minutes(*minutes)?;
            let sound = sound.as_deref().map(parse_sound).transpose()?;
            ReminderRepo::set(conn, prayer, *minutes, sound)?;
            println_colored!(GREEN, "  ✓ {} reminder {} minutes before", prayer.display_name(), minutes);
        }
        ReminderCommands::Enable { prayer } | ReminderCommands::Disable { prayer } => {
            let enabled = matches!(action, ReminderCommands::Enable { .. });
            let prayer = parse_prayer(prayer)?;
            if !ReminderRepo::set_enabled(conn, prayer, enabled)? {
                bail!("No reminder is kept for {}", prayer.display_name());
            }
            if enabled {
                println_colored!(GREEN, "  ✓ {} reminder on", prayer.display_name());
            } else {
                println_colored!(DIM, "  ○ {} reminder off", prayer.display_name());
            }
        }
    }
    Ok(())
}

pub fn handle_alarm(conn: &Connection, action: &AlarmCommands) -> Result<()> {
    match action {
        AlarmCommands::List => {
            let alarms = AlarmRepo::list(conn)?;
            println!();
            if alarms.is_empty() {
                println_colored!(DIM, "  No custom alarms. Add one with: tilawah alarm add <label> --prayer isha --offset 60");
            }
            for a in &alarms {
                let line = format!(
                    "  {:>3}  {}  {}  {}",
                    a.id,
                    fit_width(&a.label, 20),
                    fit_width(&a.describe_offset(), 22),
                    a.sound.as_str()
                );
                if a.enabled {
                    println!("{}", line);
                } else {
                    println_colored!(DIM, "{}  (off)", line);
                }
            }
            println!();
        }
        AlarmCommands::Add { label, prayer, offset, sound } => {
            let anchor = parse_prayer(prayer)?;
            validate_alarm_offset(*offset)?;
            let sound = parse_sound(sound)?;
            let label = label.trim();
            if label.is_empty() {
                bail!("Alarm label cannot be empty");
            }
            let id = AlarmRepo::add(conn, label, anchor, *offset, sound)?;
            println_colored!(GREEN, "  ✓ Alarm #{} added", id);
        }
        AlarmCommands::Remove { id } => {
            if AlarmRepo::remove(conn, *id)? {
                println_colored!(GREEN, "  ✓ Alarm #{} removed", id);
            } else {
                println_colored!(RED, "  ✗ No alarm #{}", id);
            }
        }
        AlarmCommands::Toggle { id } => match AlarmRepo::toggle(conn, *id)? {
            Some(true) => println_colored!(GREEN, "  ✓ Alarm #{} on", id),
            Some(false) => println_colored!(DIM, "  ○ Alarm #{} off", id),
            None => println_colored!(RED, "  ✗ No alarm #{}", id),
        },
    }
    Ok(())
}

pub fn handle_watch(conn: &Connection, config: &AppConfig) -> Result<()> {
    let provider = TimingsProvider::from_config(config)?;
    let mut notifier = TerminalNotifier::new(SoundCue::from_config(config));
    println_colored!(GOLD, "  Watching reminders for {} · Ctrl-C to quit", config.location.name);
    reminders::watch(conn, &provider, config, &mut notifier)
}

// ─── Radio ───────────────────────────────────────────────────────────────────

pub fn handle_radio(config: &AppConfig, action: &RadioCommands) -> Result<()> {
    let client = http_client(config)?;
    let stations = radio::stations(client.as_ref(), &config.api.radio_url);
    match action {
        RadioCommands::List => {
            println!();
            for s in &stations {
                println!("  {:>4}  {}", s.id, s.name);
            }
            println!();
        }
        RadioCommands::Play { id } => {
            let station = stations
                .iter()
                .find(|s| s.id == *id)
                .ok_or_else(|| anyhow!("No station with id {}. See: tilawah radio list", id))?;
            let mut player = AudioPlayer::from_config(&config.audio);
            player.play(&station.url, &station.name)?;
            println_colored!(GREEN, "  ▶ {}", station.name);
            println_colored!(DIM, "  Ctrl-C to stop");
            player.wait()?;
        }
    }
    Ok(())
}

// ─── Locations ───────────────────────────────────────────────────────────────

pub fn handle_location(conn: &Connection, config: &mut AppConfig, action: &LocationCommands) -> Result<()> {
    match action {
        LocationCommands::List => {
            let saved = LocationRepo::list(conn)?;
            println!();
            if saved.is_empty() {
                println_colored!(DIM, "  No saved locations");
            }
            for loc in &saved {
                let current = loc.name == config.location.name;
                println!(
                    "  {}  {}  {:>8.4}, {:>9.4}  {}",
                    if current { "●" } else { " " },
                    fit_width(&loc.name, 18),
                    loc.latitude,
                    loc.longitude,
                    format_tz_offset(loc.timezone_offset)
                );
            }
            println!();
        }
        LocationCommands::Save { name } => {
            let loc = &config.location;
            LocationRepo::save(
                conn,
                &SavedLocation {
                    id: 0,
                    name: name.trim().to_string(),
                    latitude: loc.latitude,
                    longitude: loc.longitude,
                    timezone_offset: loc.timezone_offset,
                    city: loc.city.clone(),
                    country: loc.country.clone(),
                },
            )?;
            println_colored!(GREEN, "  ✓ Saved current location as '{}'", name.trim());
        }
        LocationCommands::Use { name } => {
            let saved = LocationRepo::find(conn, name)?
                .ok_or_else(|| anyhow!("No saved location '{}'", name))?;
            config.location.name = saved.name.clone();
            config.location.latitude = saved.latitude;
            config.location.longitude = saved.longitude;
            config.location.timezone_offset = saved.timezone_offset;
            config.location.city = saved.city;
            config.location.country = saved.country;
            config.save()?;
            println_colored!(GREEN, "  ✓ Now using {}", saved.name);
        }
        LocationCommands::Remove { name } => {
            if LocationRepo::remove(conn, name)? {
                println_colored!(GREEN, "  ✓ Removed '{}'", name);
            } else {
                println_colored!(RED, "  ✗ No saved location '{}'", name);
            }
        }
    }
    Ok(())
}

// ─── Misc ────────────────────────────────────────────────────────────────────

pub fn handle_history(conn: &Connection, clear: bool) -> Result<()> {
    if clear {
        HistoryRepo::clear(conn)?;
        println_colored!(GREEN, "  ✓ Search history cleared");
        return Ok(());
    }
    let recent = HistoryRepo::recent(conn, HISTORY_LIMIT)?;
    println!();
    if recent.is_empty() {
        println_colored!(DIM, "  No searches yet");
    }
    for q in &recent {
        println!("  {}", q);
    }
    println!();
    Ok(())
}

pub fn handle_theme(config: &mut AppConfig, mode: Option<&str>) -> Result<()> {
    config.ui.theme = match mode {
        Some("light") => ThemeMode::Light,
        Some("dark") => ThemeMode::Dark,
        Some(other) => bail!("Unknown theme '{}'", other),
        None => config.ui.theme.toggled(),
    };
    config.save()?;
    println_colored!(GREEN, "  ✓ Theme: {}", config.ui.theme.as_str());
    Ok(())
}

pub fn handle_bookmark(conn: &Connection) -> Result<()> {
    match BookmarkRepo::get(conn)? {
        Some(b) => {
            let name = surahs::surah(b.surah).map(|s| s.name_en).unwrap_or("?");
            println_colored!(GOLD, "  Last read: {} {}:{}", name, b.surah, b.ayah);
            println_colored!(DIM, "  {}", b.updated_at);
        }
        None => println_colored!(DIM, "  Nothing read yet. Try: tilawah surah read 1"),
    }
    Ok(())
}

pub fn handle_reciters(config: &AppConfig) -> Result<()> {
    let client = http_client(config)?.ok_or_else(|| anyhow!("Listing reciters needs online access ([api] online = true)"))?;
    let reciters = AlQuranApi::new(&client, &config.api.quran_url)
        .reciters()
        .context("Fetching reciters from alquran.cloud")?;
    println!();
    for r in &reciters {
        let current = r.identifier == config.quran.reciter;
        println!(
            "  {} {}  {}",
            if current { "●" } else { " " },
            fit_width(&r.identifier, 24),
            r.english_name
        );
    }
    println!();
    Ok(())
}
