use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuaCategory {
    Morning,
    Evening,
    Prayer,
    Travel,
    Food,
    Sleep,
    Protection,
    Forgiveness,
    Quranic,
    General,
}

impl DuaCategory {
    pub fn all() -> Vec<DuaCategory> {
        vec![
            DuaCategory::Morning,
            DuaCategory::Evening,
            DuaCategory::Prayer,
            DuaCategory::Travel,
            DuaCategory::Food,
            DuaCategory::Sleep,
            DuaCategory::Protection,
            DuaCategory::Forgiveness,
            DuaCategory::Quranic,
            DuaCategory::General,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuaCategory::Morning => "morning",
            DuaCategory::Evening => "evening",
            DuaCategory::Prayer => "prayer",
            DuaCategory::Travel => "travel",
            DuaCategory::Food => "food",
            DuaCategory::Sleep => "sleep",
            DuaCategory::Protection => "protection",
            DuaCategory::Forgiveness => "forgiveness",
            DuaCategory::Quranic => "quranic",
            DuaCategory::General => "general",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DuaCategory::Morning => "Morning",
            DuaCategory::Evening => "Evening",
            DuaCategory::Prayer => "Salah",
            DuaCategory::Travel => "Travel",
            DuaCategory::Food => "Food & Drink",
            DuaCategory::Sleep => "Sleep",
            DuaCategory::Protection => "Protection",
            DuaCategory::Forgiveness => "Forgiveness",
            DuaCategory::Quranic => "From the Quran",
            DuaCategory::General => "General",
        }
    }
}

impl FromStr for DuaCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DuaCategory::all()
            .into_iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown dua category: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dua {
    pub id: u32,
    pub category: DuaCategory,
    pub title: &'static str,
    pub arabic: &'static str,
    pub transliteration: &'static str,
    pub translation: &'static str,
    pub reference: Option<&'static str>,
}
