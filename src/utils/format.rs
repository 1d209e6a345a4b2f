use anyhow::{Result, bail};
use chrono::NaiveTime;
use unicode_width::UnicodeWidthStr;

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", secs)
    }
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Minutes from UTC as "UTC+05:30"
pub fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// Accepts "+3", "-4:30", "5.5", "UTC+05:30" or "0" and returns minutes from UTC.
pub fn parse_tz_offset(input: &str) -> Result<i32> {
    let s = input.trim();
    let s = s
        .strip_prefix("UTC")
        .or_else(|| s.strip_prefix("utc"))
        .or_else(|| s.strip_prefix("GMT"))
        .unwrap_or(s)
        .trim();
    if s.is_empty() {
        return Ok(0);
    }

    let (negative, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let minutes = if let Some((h, m)) = body.split_once(':') {
        let h: i32 = h.trim().parse().map_err(|_| anyhow::anyhow!("Invalid hours in '{}'", input))?;
        let m: i32 = m.trim().parse().map_err(|_| anyhow::anyhow!("Invalid minutes in '{}'", input))?;
        if !(0..60).contains(&m) {
            bail!("Minutes must be 0-59 in '{}'", input);
        }
        h * 60 + m
    } else {
        let hours: f64 = body.parse().map_err(|_| anyhow::anyhow!("Invalid UTC offset '{}'", input))?;
        (hours * 60.0).round() as i32
    };

    if minutes > 14 * 60 {
        bail!("UTC offset must be between -12:00 and +14:00");
    }
    let minutes = if negative { -minutes } else { minutes };
    if minutes < -12 * 60 {
        bail!("UTC offset must be between -12:00 and +14:00");
    }
    Ok(minutes)
}

/// Pad or truncate to a display width, counting wide glyphs as two columns.
pub fn fit_width(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current <= width {
        return format!("{}{}", s, " ".repeat(width - current));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration_secs(0), "now");
        assert_eq!(format_duration_secs(42), "42s");
        assert_eq!(format_duration_secs(600), "10m");
        assert_eq!(format_duration_secs(3 * 3600 + 125), "3h 2m");
    }

    #[test]
    fn tz_offsets() {
        assert_eq!(parse_tz_offset("+3").unwrap(), 180);
        assert_eq!(parse_tz_offset("-4:30").unwrap(), -270);
        assert_eq!(parse_tz_offset("5.5").unwrap(), 330);
        assert_eq!(parse_tz_offset("UTC+05:45").unwrap(), 345);
        assert_eq!(parse_tz_offset("0").unwrap(), 0);
        assert!(parse_tz_offset("+15").is_err());
        assert!(parse_tz_offset("-13").is_err());
        assert!(parse_tz_offset("3:75").is_err());
        assert!(parse_tz_offset("abc").is_err());

        assert_eq!(format_tz_offset(330), "UTC+05:30");
        assert_eq!(format_tz_offset(-270), "UTC-04:30");
        assert_eq!(format_tz_offset(0), "UTC+00:00");
    }

    #[test]
    fn fit_width_counts_columns() {
        assert_eq!(fit_width("Fajr", 6), "Fajr  ");
        assert_eq!(fit_width("Al-Baqarah", 6), "Al-Ba…");
        assert_eq!(UnicodeWidthStr::width(fit_width("الفاتحة", 10).as_str()), 10);
    }
}
