pub mod scheduler;

pub use scheduler::{ReminderScheduler, Trigger, triggers_for};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use rusqlite::Connection;
use std::io::Write;

use crate::audio::AudioPlayer;
use crate::config::AppConfig;
use crate::db::repository::{AlarmRepo, ReminderRepo};
use crate::models::AlarmSound;
use crate::prayer_times::TimingsProvider;

/// Triggers for the prayer timings of `date`, from the stored reminders and alarms.
pub fn load_triggers(
    conn: &Connection,
    provider: &TimingsProvider,
    date: NaiveDate,
) -> Result<Vec<Trigger>> {
    let timings = provider.timings(conn, date)?;
    let reminders = ReminderRepo::list(conn)?;
    let alarms = AlarmRepo::list(conn)?;
    Ok(triggers_for(&timings, &reminders, &alarms))
}

/// Something that can tell the user a trigger fired.
pub trait Notifier {
    fn notify(&mut self, trigger: &Trigger) -> Result<()>;
}

/// Plays the audible part of a notification.
pub struct SoundCue {
    player: AudioPlayer,
    adhan_source: Option<String>,
    chime_source: Option<String>,
    bell: bool,
}

impl SoundCue {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            player: AudioPlayer::from_config(&config.audio),
            adhan_source: config.audio.adhan_source.clone(),
            chime_source: config.audio.chime_source.clone(),
            bell: config.reminders.bell,
        }
    }

    /// Falls back to the terminal bell when no source is configured or the player fails.
    pub fn play(&mut self, sound: AlarmSound, title: &str) {
        let source = match sound {
            AlarmSound::Silent => return,
            AlarmSound::Beep => None,
            AlarmSound::Adhan => self.adhan_source.clone(),
            AlarmSound::Chime => self.chime_source.clone(),
        };
        if let Some(src) = source {
            match self.player.play(&src, title) {
                Ok(()) => return,
                Err(e) => warn!("Sound cue failed, using bell: {:#}", e),
            }
        }
        self.ring_bell();
    }

    pub fn stop(&mut self) {
        if let Err(e) = self.player.stop() {
            warn!("Stopping sound cue: {:#}", e);
        }
    }

    fn ring_bell(&self) {
        if self.bell {
            print!("\x07");
            let _ = std::io::stdout().flush();
        }
    }
}

/// Prints a line per trigger to stdout and plays its sound.
pub struct TerminalNotifier {
    cue: SoundCue,
}

impl TerminalNotifier {
    pub fn new(cue: SoundCue) -> Self {
        Self { cue }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, trigger: &Trigger) -> Result<()> {
        println!(
            "\x1b[1;33m🔔 {}\x1b[0m  \x1b[2m{}\x1b[0m",
            trigger.label,
            trigger.at.format("%H:%M")
        );
        self.cue.play(trigger.sound, &trigger.label);
        Ok(())
    }
}

/// Foreground loop: rebuild at each new day, fire due triggers, sleep, repeat.
pub fn watch(
    conn: &Connection,
    provider: &TimingsProvider,
    config: &AppConfig,
    notifier: &mut dyn Notifier,
) -> Result<()> {
    let mut scheduler = ReminderScheduler::new(config.reminders.window_secs);
    let interval = config.reminders.poll_interval();

    loop {
        let now = Local::now().naive_local();
        if scheduler.needs_refresh(now) {
            // Keep the previous day's schedule and retry on the next tick
            match scheduler.refresh(now, |d| load_triggers(conn, provider, d)) {
                Ok(_) => info!(
                    "Scheduled {} reminder(s) for {}",
                    scheduler.triggers().len(),
                    now.date()
                ),
                Err(e) => warn!("Could not build reminder schedule: {:#}", e),
            }
        }
        for trigger in scheduler.poll(now) {
            notifier.notify(&trigger)?;
        }
        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::LocationConfig;
    use crate::db::migrations::run_migrations;
    use crate::models::PrayerType;

    #[test]
    fn load_triggers_uses_seeded_reminders() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let provider = TimingsProvider::offline(LocationConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let triggers = load_triggers(&conn, &provider, date).unwrap();
        assert_eq!(triggers.len(), 5);
        assert!(triggers.iter().all(|t| t.sound == AlarmSound::Beep));

        let timings = provider.timings(&conn, date).unwrap();
        let fajr = triggers.iter().find(|t| t.prayer == PrayerType::Fajr).unwrap();
        assert_eq!(
            fajr.at,
            date.and_time(timings.fajr) - chrono::Duration::minutes(10)
        );
    }

    #[test]
    fn disabled_reminders_and_alarms_are_skipped() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        ReminderRepo::set_enabled(&conn, PrayerType::Asr, false).unwrap();
        let id = AlarmRepo::add(&conn, "Duha", PrayerType::Sunrise, 20, AlarmSound::Silent).unwrap();
        let provider = TimingsProvider::offline(LocationConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let triggers = load_triggers(&conn, &provider, date).unwrap();
        assert_eq!(triggers.len(), 5);
        assert!(triggers.iter().all(|t| t.prayer != PrayerType::Asr));

        AlarmRepo::toggle(&conn, id).unwrap();
        let triggers = load_triggers(&conn, &provider, date).unwrap();
        assert_eq!(triggers.len(), 4);
    }

    struct Recorder(Vec<String>);

    impl Notifier for Recorder {
        fn notify(&mut self, trigger: &Trigger) -> Result<()> {
            self.0.push(trigger.key.clone());
            Ok(())
        }
    }

    #[test]
    fn notifier_receives_each_due_trigger_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let provider = TimingsProvider::offline(LocationConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut scheduler = ReminderScheduler::new(60);
        let start = date.and_hms_opt(0, 0, 1).unwrap();
        scheduler
            .refresh(start, |d| load_triggers(&conn, &provider, d))
            .unwrap();

        let first = scheduler.triggers()[0].at;
        let mut rec = Recorder(Vec::new());
        for secs in 0..90 {
            for t in scheduler.poll(first + chrono::Duration::seconds(secs)) {
                rec.notify(&t).unwrap();
            }
        }
        assert_eq!(rec.0.len(), 1);
    }
}
