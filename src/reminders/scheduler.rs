use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::models::{AlarmSound, CustomAlarm, PrayerTimings, PrayerType, Reminder};

/// One concrete firing time derived from a reminder or alarm.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    /// Unique per source and timings date
    pub key: String,
    pub label: String,
    pub at: NaiveDateTime,
    pub sound: AlarmSound,
    pub prayer: PrayerType,
}

/// Expand enabled reminders and alarms against one day's timings.
///
/// Offsets are applied as datetime arithmetic, so a reminder 30 minutes
/// before a 00:10 Fajr lands on the previous calendar day.
pub fn triggers_for(
    timings: &PrayerTimings,
    reminders: &[Reminder],
    alarms: &[CustomAlarm],
) -> Vec<Trigger> {
    let at_prayer = |p: PrayerType| timings.date.and_time(timings.time_of(p));
    let mut out = Vec::new();

    for r in reminders.iter().filter(|r| r.enabled) {
        let label = if r.minutes_before == 0 {
            format!("{} time", r.prayer.display_name())
        } else {
            format!("{} in {} minutes", r.prayer.display_name(), r.minutes_before)
        };
        out.push(Trigger {
            key: format!("reminder:{}:{}", r.id, timings.date),
            label,
            at: at_prayer(r.prayer) - Duration::minutes(r.minutes_before as i64),
            sound: r.sound,
            prayer: r.prayer,
        });
    }

    for a in alarms.iter().filter(|a| a.enabled) {
        out.push(Trigger {
            key: format!("alarm:{}:{}", a.id, timings.date),
            label: format!("{} ({})", a.label, a.describe_offset()),
            at: at_prayer(a.anchor) + Duration::minutes(a.offset_minutes as i64),
            sound: a.sound,
            prayer: a.anchor,
        });
    }

    out.sort_by_key(|t| t.at);
    out
}

/// Per-second matcher: fires each trigger once while `now` is inside its window.
pub struct ReminderScheduler {
    day: Option<NaiveDate>,
    window: Duration,
    triggers: Vec<Trigger>,
    fired: HashSet<String>,
    stale: bool,
}

impl ReminderScheduler {
    pub fn new(window_secs: i64) -> Self {
        Self {
            day: None,
            window: Duration::seconds(window_secs.max(1)),
            triggers: Vec::new(),
            fired: HashSet::new(),
            stale: false,
        }
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn needs_refresh(&self, now: NaiveDateTime) -> bool {
        self.stale || self.day != Some(now.date())
    }

    /// Rebuild the schedule for `now`'s calendar day when the day changed.
    ///
    /// `load` returns triggers for a timings date; neighbouring days are
    /// loaded too so offsets that cross midnight are not lost.
    pub fn refresh<F>(&mut self, now: NaiveDateTime, mut load: F) -> Result<bool>
    where
        F: FnMut(NaiveDate) -> Result<Vec<Trigger>>,
    {
        if !self.needs_refresh(now) {
            return Ok(false);
        }
        let day = now.date();
        let mut triggers = Vec::new();
        for d in [day.pred_opt(), Some(day), day.succ_opt()].into_iter().flatten() {
            triggers.extend(load(d)?.into_iter().filter(|t| t.at.date() == day));
        }
        triggers.sort_by_key(|t| t.at);

        if self.day != Some(day) {
            self.fired.clear();
        }
        self.triggers = triggers;
        self.day = Some(day);
        self.stale = false;
        Ok(true)
    }

    /// Force a rebuild on the next `refresh`, e.g. after reminders were edited.
    /// Fired keys survive a same-day rebuild so edits don't re-ring.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Triggers due at `now` that have not fired yet; marks them fired.
    pub fn poll(&mut self, now: NaiveDateTime) -> Vec<Trigger> {
        let mut due = Vec::new();
        for t in &self.triggers {
            if t.at <= now && now < t.at + self.window && !self.fired.contains(&t.key) {
                due.push(t.clone());
            }
        }
        for t in &due {
            self.fired.insert(t.key.clone());
        }
        due
    }

    pub fn upcoming(&self, now: NaiveDateTime, n: usize) -> Vec<&Trigger> {
        self.triggers.iter().filter(|t| t.at > now).take(n).collect()
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimingsSource;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn timings(date: NaiveDate) -> PrayerTimings {
        PrayerTimings {
            date,
            fajr: t(0, 10),
            sunrise: t(6, 0),
            zuhr: t(12, 0),
            asr: t(15, 30),
            maghrib: t(18, 0),
            isha: t(23, 30),
            source: TimingsSource::Offline,
            hijri: None,
        }
    }

    fn reminder(id: i64, prayer: PrayerType, minutes: u32, enabled: bool) -> Reminder {
        Reminder {
            id,
            prayer,
            minutes_before: minutes,
            enabled,
            sound: AlarmSound::Beep,
        }
    }

    fn alarm(id: i64, anchor: PrayerType, offset: i32) -> CustomAlarm {
        CustomAlarm {
            id,
            label: "Witr".to_string(),
            anchor,
            offset_minutes: offset,
            enabled: true,
            sound: AlarmSound::Chime,
        }
    }

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn offsets_are_applied_and_sorted() {
        let triggers = triggers_for(
            &timings(day(19)),
            &[
                reminder(1, PrayerType::Asr, 15, true),
                reminder(2, PrayerType::Zuhr, 0, true),
                reminder(3, PrayerType::Maghrib, 5, false),
            ],
            &[alarm(9, PrayerType::Zuhr, 45)],
        );

        let times: Vec<NaiveDateTime> = triggers.iter().map(|t| t.at).collect();
        assert_eq!(times, vec![at(19, 12, 0, 0), at(19, 12, 45, 0), at(19, 15, 15, 0)]);
        assert_eq!(triggers[0].label, "Zuhr time");
        assert_eq!(triggers[1].label, "Witr (45m after Zuhr)");
        assert_eq!(triggers[2].label, "Asr in 15 minutes");
    }

    #[test]
    fn offsets_cross_midnight() {
        let triggers = triggers_for(
            &timings(day(19)),
            &[reminder(1, PrayerType::Fajr, 30, true)],
            &[alarm(2, PrayerType::Isha, 60)],
        );
        assert_eq!(triggers[0].at, at(18, 23, 40, 0));
        assert_eq!(triggers[1].at, at(20, 0, 30, 0));
    }

    #[test]
    fn fires_once_within_window() {
        let mut s = ReminderScheduler::new(60);
        let reminders = [reminder(1, PrayerType::Zuhr, 10, true)];
        s.refresh(at(19, 11, 0, 0), |d| Ok(triggers_for(&timings(d), &reminders, &[])))
            .unwrap();

        assert!(s.poll(at(19, 11, 49, 59)).is_empty());
        let fired = s.poll(at(19, 11, 50, 0));
        assert_eq!(fired.len(), 1);
        assert!(s.poll(at(19, 11, 50, 1)).is_empty());
        assert!(s.poll(at(19, 11, 50, 59)).is_empty());
    }

    #[test]
    fn late_start_does_not_catch_up() {
        let mut s = ReminderScheduler::new(60);
        let reminders = [reminder(1, PrayerType::Zuhr, 10, true)];
        s.refresh(at(19, 11, 51, 0), |d| Ok(triggers_for(&timings(d), &reminders, &[])))
            .unwrap();
        assert!(s.poll(at(19, 11, 51, 0)).is_empty());
    }

    #[test]
    fn midnight_rollover_clears_and_rebuilds() {
        let mut s = ReminderScheduler::new(60);
        let reminders = [reminder(1, PrayerType::Fajr, 30, true)];
        let load = |d: NaiveDate| Ok(triggers_for(&timings(d), &reminders, &[]));

        // Tomorrow's Fajr reminder falls tonight at 23:40
        assert!(s.refresh(at(19, 20, 0, 0), load).unwrap());
        assert_eq!(s.triggers().len(), 1);
        assert_eq!(s.triggers()[0].at, at(19, 23, 40, 0));
        assert_eq!(s.poll(at(19, 23, 40, 10)).len(), 1);

        assert!(!s.refresh(at(19, 23, 59, 0), load).unwrap());
        assert!(s.refresh(at(20, 0, 0, 1), load).unwrap());
        assert_eq!(s.day(), Some(day(20)));
        assert_eq!(s.triggers()[0].at, at(20, 23, 40, 0));
        assert_eq!(s.poll(at(20, 23, 40, 0)).len(), 1);
    }

    #[test]
    fn invalidate_keeps_fired_keys_same_day() {
        let mut s = ReminderScheduler::new(60);
        let reminders = [reminder(1, PrayerType::Zuhr, 0, true)];
        let load = |d: NaiveDate| Ok(triggers_for(&timings(d), &reminders, &[]));

        s.refresh(at(19, 11, 0, 0), load).unwrap();
        assert_eq!(s.poll(at(19, 12, 0, 5)).len(), 1);

        s.invalidate();
        assert!(s.refresh(at(19, 12, 0, 10), load).unwrap());
        assert!(s.poll(at(19, 12, 0, 20)).is_empty());
    }

    #[test]
    fn upcoming_lists_future_only() {
        let mut s = ReminderScheduler::new(60);
        let reminders = [
            reminder(1, PrayerType::Zuhr, 0, true),
            reminder(2, PrayerType::Asr, 0, true),
            reminder(3, PrayerType::Maghrib, 0, true),
        ];
        s.refresh(at(19, 13, 0, 0), |d| Ok(triggers_for(&timings(d), &reminders, &[])))
            .unwrap();
        let next: Vec<PrayerType> = s.upcoming(at(19, 13, 0, 0), 5).iter().map(|t| t.prayer).collect();
        assert_eq!(next, vec![PrayerType::Asr, PrayerType::Maghrib]);
    }

    #[test]
    fn failed_load_retries_next_refresh() {
        let mut s = ReminderScheduler::new(60);
        assert!(s.refresh(at(19, 9, 0, 0), |_| Err(anyhow::anyhow!("db locked"))).is_err());
        assert!(s.needs_refresh(at(19, 9, 0, 1)));
    }
}
