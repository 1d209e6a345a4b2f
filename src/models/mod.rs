pub mod dua;
pub mod location;
pub mod prayer;
pub mod radio;
pub mod reminder;
pub mod surah;

pub use dua::{Dua, DuaCategory};
pub use location::SavedLocation;
pub use prayer::{PrayerTimings, PrayerType, TimingsSource};
pub use radio::RadioStation;
pub use reminder::{AlarmSound, CustomAlarm, Reminder};
pub use surah::{Ayah, Bookmark, Reciter, RevelationType, Surah, SurahText};
