use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::PrayerType;

/// Longest lead time accepted for a prayer reminder.
pub const MAX_REMINDER_MINUTES: u32 = 180;
/// Largest offset, either side of the anchor prayer, for a custom alarm.
pub const MAX_ALARM_OFFSET: i32 = 720;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSound {
    Adhan,
    Beep,
    Chime,
    Silent,
}

impl AlarmSound {
    pub fn all() -> Vec<AlarmSound> {
        vec![
            AlarmSound::Adhan,
            AlarmSound::Beep,
            AlarmSound::Chime,
            AlarmSound::Silent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmSound::Adhan => "adhan",
            AlarmSound::Beep => "beep",
            AlarmSound::Chime => "chime",
            AlarmSound::Silent => "silent",
        }
    }
}

impl FromStr for AlarmSound {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adhan" | "azan" => Ok(AlarmSound::Adhan),
            "beep" | "bell" => Ok(AlarmSound::Beep),
            "chime" => Ok(AlarmSound::Chime),
            "silent" | "none" => Ok(AlarmSound::Silent),
            _ => Err(anyhow::anyhow!(
                "Unknown sound '{}'. Use: adhan, beep, chime, silent",
                s
            )),
        }
    }
}

/// A lead-time reminder before one of the obligatory prayers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub prayer: PrayerType,
    pub minutes_before: u32,
    pub enabled: bool,
    pub sound: AlarmSound,
}

/// A user alarm anchored to a prayer; negative offsets fire before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAlarm {
    pub id: i64,
    pub label: String,
    pub anchor: PrayerType,
    pub offset_minutes: i32,
    pub enabled: bool,
    pub sound: AlarmSound,
}

impl CustomAlarm {
    pub fn describe_offset(&self) -> String {
        match self.offset_minutes {
            0 => format!("at {}", self.anchor.display_name()),
            m if m < 0 => format!("{}m before {}", -m, self.anchor.display_name()),
            m => format!("{}m after {}", m, self.anchor.display_name()),
        }
    }
}

pub fn validate_reminder_minutes(minutes: u32) -> anyhow::Result<()> {
    if minutes > MAX_REMINDER_MINUTES {
        anyhow::bail!(
            "Reminder lead time must be at most {} minutes",
            MAX_REMINDER_MINUTES
        );
    }
    Ok(())
}

pub fn validate_alarm_offset(offset: i32) -> anyhow::Result<()> {
    if offset.abs() > MAX_ALARM_OFFSET {
        anyhow::bail!(
            "Alarm offset must be within ±{} minutes of the prayer",
            MAX_ALARM_OFFSET
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_lead_time_is_bounded() {
        assert!(validate_reminder_minutes(0).is_ok());
        assert!(validate_reminder_minutes(MAX_REMINDER_MINUTES).is_ok());
        assert!(validate_reminder_minutes(MAX_REMINDER_MINUTES + 1).is_err());
    }

    #[test]
    fn alarm_offset_is_bounded_both_sides() {
        assert!(validate_alarm_offset(MAX_ALARM_OFFSET).is_ok());
        assert!(validate_alarm_offset(-MAX_ALARM_OFFSET).is_ok());
        assert!(validate_alarm_offset(MAX_ALARM_OFFSET + 1).is_err());
        assert!(validate_alarm_offset(-MAX_ALARM_OFFSET - 1).is_err());
    }
}
