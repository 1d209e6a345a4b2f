use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevelationType {
    Meccan,
    Medinan,
}

impl RevelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevelationType::Meccan => "meccan",
            RevelationType::Medinan => "medinan",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RevelationType::Meccan => "Meccan",
            RevelationType::Medinan => "Medinan",
        }
    }
}

impl FromStr for RevelationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meccan" | "makkiyah" | "makki" | "mecca" => Ok(RevelationType::Meccan),
            "medinan" | "medinah" | "madaniyah" | "madani" | "medina" => {
                Ok(RevelationType::Medinan)
            }
            _ => Err(anyhow::anyhow!("Unknown revelation type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surah {
    pub number: u16,
    pub name_ar: &'static str,
    pub name_en: &'static str,
    pub translation_en: &'static str,
    pub verses: u16,
    pub revelation: RevelationType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ayah {
    /// Position across the whole mushaf (1..=6236); used for audio URLs
    pub number_global: u32,
    pub number_in_surah: u16,
    pub text_ar: String,
    pub text_translation: Option<String>,
    pub juz: u8,
    pub page: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurahText {
    pub surah: u16,
    pub edition: String,
    pub ayahs: Vec<Ayah>,
}

/// Checks an inclusive `from..=to` ayah range before anything is fetched.
pub fn validate_ayah_range(from: Option<u16>, to: Option<u16>) -> anyhow::Result<()> {
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            anyhow::bail!("Ayah range is reversed: {} comes after {}", f, t);
        }
    }
    Ok(())
}

impl SurahText {
    /// Ayahs in the inclusive range `from..=to`. Ayah 0 reads as 1 and `to`
    /// is clamped to the surah; an empty selection is an error.
    pub fn range(&self, from: Option<u16>, to: Option<u16>) -> anyhow::Result<&[Ayah]> {
        validate_ayah_range(from, to)?;
        let len = self.ayahs.len();
        let start = from.map(|f| f.saturating_sub(1) as usize).unwrap_or(0);
        if start >= len {
            anyhow::bail!("Surah {} has {} ayahs", self.surah, len);
        }
        let end = to.map(|t| t as usize).unwrap_or(len).clamp(start + 1, len);
        Ok(&self.ayahs[start..end])
    }
}

/// Last-read position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub surah: u16,
    pub ayah: u16,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reciter {
    pub identifier: String,
    pub name: String,
    pub english_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(count: u16) -> SurahText {
        SurahText {
            surah: 103,
            edition: "en.asad".to_string(),
            ayahs: (1..=count)
                .map(|n| Ayah {
                    number_global: 6220 + n as u32,
                    number_in_surah: n,
                    text_ar: format!("ayah {}", n),
                    text_translation: None,
                    juz: 30,
                    page: 601,
                })
                .collect(),
        }
    }

    fn numbers(ayahs: &[Ayah]) -> Vec<u16> {
        ayahs.iter().map(|a| a.number_in_surah).collect()
    }

    #[test]
    fn range_defaults_to_whole_surah() {
        assert_eq!(numbers(text(3).range(None, None).unwrap()), vec![1, 2, 3]);
    }

    #[test]
    fn range_treats_zero_as_first_and_clamps_end() {
        let t = text(3);
        assert_eq!(numbers(t.range(Some(0), Some(1)).unwrap()), vec![1]);
        assert_eq!(numbers(t.range(Some(2), Some(99)).unwrap()), vec![2, 3]);
        assert_eq!(numbers(t.range(Some(3), Some(3)).unwrap()), vec![3]);
    }

    #[test]
    fn reversed_or_out_of_surah_range_is_rejected() {
        let t = text(3);
        let err = t.range(Some(3), Some(2)).unwrap_err();
        assert!(err.to_string().contains("reversed"));
        assert!(t.range(Some(4), None).is_err());
        assert!(validate_ayah_range(Some(5), Some(1)).is_err());
        assert!(validate_ayah_range(Some(1), None).is_ok());
    }

    #[test]
    fn revelation_aliases_parse() {
        for s in ["Meccan", "makkiyah", "MAKKI", "mecca"] {
            assert_eq!(s.parse::<RevelationType>().unwrap(), RevelationType::Meccan);
        }
        for s in ["medinan", "Madaniyah", "medinah", "madani", "Medina"] {
            assert_eq!(s.parse::<RevelationType>().unwrap(), RevelationType::Medinan);
        }
        assert!("hijazi".parse::<RevelationType>().is_err());
    }
}
