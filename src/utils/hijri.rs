use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

pub fn hijri_month_name(month: usize) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| HIJRI_MONTH_NAMES.get(i))
        .copied()
        .unwrap_or("Unknown")
}

#[derive(Debug, Clone, PartialEq)]
pub struct HijriInfo {
    pub day: usize,
    pub month: usize,
    pub year: usize,
}

impl HijriInfo {
    pub fn month_name(&self) -> &'static str {
        hijri_month_name(self.month)
    }

    pub fn formatted(&self) -> String {
        format!("{} {} {} AH", self.day, self.month_name(), self.year)
    }

    /// Ramadan, for the dashboard greeting.
    pub fn is_ramadan(&self) -> bool {
        self.month == 9
    }
}

/// Convert a Gregorian date, shifted by `offset_days` for local moon sighting.
pub fn to_hijri(date: NaiveDate, offset_days: i32) -> Result<HijriInfo> {
    let adjusted = date + Duration::days(offset_days as i64);
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .map_err(|e| anyhow::anyhow!("Hijri conversion error: {}", e))?;

    Ok(HijriInfo {
        day: hd.day(),
        month: hd.month(),
        year: hd.year(),
    })
}

/// Hijri label for `date`, preferring the one the prayer API reported.
pub fn hijri_label(date: NaiveDate, offset_days: i32, from_api: Option<&str>) -> String {
    if offset_days == 0 {
        if let Some(label) = from_api {
            return format!("{} AH", label);
        }
    }
    match to_hijri(date, offset_days) {
        Ok(info) => info.formatted(),
        Err(e) => {
            log::warn!("{}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_bounded() {
        assert_eq!(hijri_month_name(1), "Muharram");
        assert_eq!(hijri_month_name(9), "Ramadan");
        assert_eq!(hijri_month_name(0), "Unknown");
        assert_eq!(hijri_month_name(13), "Unknown");
    }

    #[test]
    fn offset_moves_one_day() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let base = to_hijri(date, 0).unwrap();
        let next = to_hijri(date, 1).unwrap();
        assert_ne!(base, next);
        assert_eq!(to_hijri(date + Duration::days(1), 0).unwrap(), next);
    }

    #[test]
    fn api_label_wins_without_offset() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            hijri_label(date, 0, Some("8 Jumada al-Awwal 1448")),
            "8 Jumada al-Awwal 1448 AH"
        );
        assert!(hijri_label(date, 1, Some("8 Jumada al-Awwal 1448")).ends_with("AH"));
    }
}
