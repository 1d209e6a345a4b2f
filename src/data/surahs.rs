use crate::models::RevelationType::{self, Meccan, Medinan};
use crate::models::Surah;

const fn s(
    number: u16,
    name_ar: &'static str,
    name_en: &'static str,
    translation_en: &'static str,
    verses: u16,
    revelation: RevelationType,
) -> Surah {
    Surah {
        number,
        name_ar,
        name_en,
        translation_en,
        verses,
        revelation,
    }
}

pub const SURAH_COUNT: u16 = 114;
pub const AYAH_COUNT: u32 = 6236;

/// Surah metadata in mushaf order (alquran.cloud transliterations).
pub static SURAHS: [Surah; 114] = [
    s(1, "الفاتحة", "Al-Faatiha", "The Opening", 7, Meccan),
    s(2, "البقرة", "Al-Baqara", "The Cow", 286, Medinan),
    s(3, "آل عمران", "Aal-i-Imraan", "The Family of Imraan", 200, Medinan),
    s(4, "النساء", "An-Nisaa", "The Women", 176, Medinan),
    s(5, "المائدة", "Al-Maaida", "The Table", 120, Medinan),
    s(6, "الأنعام", "Al-An'aam", "The Cattle", 165, Meccan),
    s(7, "الأعراف", "Al-A'raaf", "The Heights", 206, Meccan),
    s(8, "الأنفال", "Al-Anfaal", "The Spoils of War", 75, Medinan),
    s(9, "التوبة", "At-Tawba", "The Repentance", 129, Medinan),
    s(10, "يونس", "Yunus", "Jonas", 109, Meccan),
    s(11, "هود", "Hud", "Hud", 123, Meccan),
    s(12, "يوسف", "Yusuf", "Joseph", 111, Meccan),
    s(13, "الرعد", "Ar-Ra'd", "The Thunder", 43, Medinan),
    s(14, "ابراهيم", "Ibrahim", "Abraham", 52, Meccan),
    s(15, "الحجر", "Al-Hijr", "The Rock", 99, Meccan),
    s(16, "النحل", "An-Nahl", "The Bee", 128, Meccan),
    s(17, "الإسراء", "Al-Israa", "The Night Journey", 111, Meccan),
    s(18, "الكهف", "Al-Kahf", "The Cave", 110, Meccan),
    s(19, "مريم", "Maryam", "Mary", 98, Meccan),
    s(20, "طه", "Taa-Haa", "Taa-Haa", 135, Meccan),
    s(21, "الأنبياء", "Al-Anbiyaa", "The Prophets", 112, Meccan),
    s(22, "الحج", "Al-Hajj", "The Pilgrimage", 78, Medinan),
    s(23, "المؤمنون", "Al-Muminoon", "The Believers", 118, Meccan),
    s(24, "النور", "An-Noor", "The Light", 64, Medinan),
    s(25, "الفرقان", "Al-Furqaan", "The Criterion", 77, Meccan),
    s(26, "الشعراء", "Ash-Shu'araa", "The Poets", 227, Meccan),
    s(27, "النمل", "An-Naml", "The Ant", 93, Meccan),
    s(28, "القصص", "Al-Qasas", "The Stories", 88, Meccan),
    s(29, "العنكبوت", "Al-Ankaboot", "The Spider", 69, Meccan),
    s(30, "الروم", "Ar-Room", "The Romans", 60, Meccan),
    s(31, "لقمان", "Luqman", "Luqman", 34, Meccan),
    s(32, "السجدة", "As-Sajda", "The Prostration", 30, Meccan),
    s(33, "الأحزاب", "Al-Ahzaab", "The Clans", 73, Medinan),
    s(34, "سبإ", "Saba", "Sheba", 54, Meccan),
    s(35, "فاطر", "Faatir", "The Originator", 45, Meccan),
    s(36, "يس", "Yaseen", "Yaseen", 83, Meccan),
    s(37, "الصافات", "As-Saaffaat", "Those drawn up in Ranks", 182, Meccan),
    s(38, "ص", "Saad", "The letter Saad", 88, Meccan),
    s(39, "الزمر", "Az-Zumar", "The Groups", 75, Meccan),
    s(40, "غافر", "Ghafir", "The Forgiver", 85, Meccan),
    s(41, "فصلت", "Fussilat", "Explained in detail", 54, Meccan),
    s(42, "الشورى", "Ash-Shura", "Consultation", 53, Meccan),
    s(43, "الزخرف", "Az-Zukhruf", "Ornaments of gold", 89, Meccan),
    s(44, "الدخان", "Ad-Dukhaan", "The Smoke", 59, Meccan),
    s(45, "الجاثية", "Al-Jaathiya", "Crouching", 37, Meccan),
    s(46, "الأحقاف", "Al-Ahqaf", "The Dunes", 35, Meccan),
    s(47, "محمد", "Muhammad", "Muhammad", 38, Medinan),
    s(48, "الفتح", "Al-Fath", "The Victory", 29, Medinan),
    s(49, "الحجرات", "Al-Hujuraat", "The Inner Apartments", 18, Medinan),
    s(50, "ق", "Qaaf", "The letter Qaaf", 45, Meccan),
    s(51, "الذاريات", "Adh-Dhaariyat", "The Winnowing Winds", 60, Meccan),
    s(52, "الطور", "At-Tur", "The Mount", 49, Meccan),
    s(53, "النجم", "An-Najm", "The Star", 62, Meccan),
    s(54, "القمر", "Al-Qamar", "The Moon", 55, Meccan),
    s(55, "الرحمن", "Ar-Rahmaan", "The Beneficent", 78, Medinan),
    s(56, "الواقعة", "Al-Waaqia", "The Inevitable", 96, Meccan),
    s(57, "الحديد", "Al-Hadid", "The Iron", 29, Medinan),
    s(58, "المجادلة", "Al-Mujaadila", "The Pleading Woman", 22, Medinan),
    s(59, "الحشر", "Al-Hashr", "The Exile", 24, Medinan),
    s(60, "الممتحنة", "Al-Mumtahana", "She that is to be examined", 13, Medinan),
    s(61, "الصف", "As-Saff", "The Ranks", 14, Medinan),
    s(62, "الجمعة", "Al-Jumu'a", "Friday", 11, Medinan),
    s(63, "المنافقون", "Al-Munaafiqoon", "The Hypocrites", 11, Medinan),
    s(64, "التغابن", "At-Taghaabun", "Mutual Disillusion", 18, Medinan),
    s(65, "الطلاق", "At-Talaaq", "Divorce", 12, Medinan),
    s(66, "التحريم", "At-Tahrim", "The Prohibition", 12, Medinan),
    s(67, "الملك", "Al-Mulk", "The Sovereignty", 30, Meccan),
    s(68, "القلم", "Al-Qalam", "The Pen", 52, Meccan),
    s(69, "الحاقة", "Al-Haaqqa", "The Reality", 52, Meccan),
    s(70, "المعارج", "Al-Ma'aarij", "The Ascending Stairways", 44, Meccan),
    s(71, "نوح", "Nooh", "Noah", 28, Meccan),
    s(72, "الجن", "Al-Jinn", "The Jinn", 28, Meccan),
    s(73, "المزمل", "Al-Muzzammil", "The Enshrouded One", 20, Meccan),
    s(74, "المدثر", "Al-Muddaththir", "The Cloaked One", 56, Meccan),
    s(75, "القيامة", "Al-Qiyaama", "The Resurrection", 40, Meccan),
    s(76, "الانسان", "Al-Insaan", "Man", 31, Medinan),
    s(77, "المرسلات", "Al-Mursalaat", "The Emissaries", 50, Meccan),
    s(78, "النبإ", "An-Naba", "The Announcement", 40, Meccan),
    s(79, "النازعات", "An-Naazi'aat", "Those who drag forth", 46, Meccan),
    s(80, "عبس", "Abasa", "He frowned", 42, Meccan),
    s(81, "التكوير", "At-Takwir", "The Overthrowing", 29, Meccan),
    s(82, "الإنفطار", "Al-Infitaar", "The Cleaving", 19, Meccan),
    s(83, "المطففين", "Al-Mutaffifin", "Defrauding", 36, Meccan),
    s(84, "الإنشقاق", "Al-Inshiqaaq", "The Splitting Open", 25, Meccan),
    s(85, "البروج", "Al-Burooj", "The Constellations", 22, Meccan),
    s(86, "الطارق", "At-Taariq", "The Morning Star", 17, Meccan),
    s(87, "الأعلى", "Al-A'laa", "The Most High", 19, Meccan),
    s(88, "الغاشية", "Al-Ghaashiya", "The Overwhelming", 26, Meccan),
    s(89, "الفجر", "Al-Fajr", "The Dawn", 30, Meccan),
    s(90, "البلد", "Al-Balad", "The City", 20, Meccan),
    s(91, "الشمس", "Ash-Shams", "The Sun", 15, Meccan),
    s(92, "الليل", "Al-Lail", "The Night", 21, Meccan),
    s(93, "الضحى", "Ad-Dhuhaa", "The Morning Hours", 11, Meccan),
    s(94, "الشرح", "Ash-Sharh", "The Consolation", 8, Meccan),
    s(95, "التين", "At-Tin", "The Fig", 8, Meccan),
    s(96, "العلق", "Al-Alaq", "The Clot", 19, Meccan),
    s(97, "القدر", "Al-Qadr", "The Power", 5, Meccan),
    s(98, "البينة", "Al-Bayyina", "The Evidence", 8, Medinan),
    s(99, "الزلزلة", "Az-Zalzala", "The Earthquake", 8, Medinan),
    s(100, "العاديات", "Al-Aadiyaat", "The Chargers", 11, Meccan),
    s(101, "القارعة", "Al-Qaari'a", "The Calamity", 11, Meccan),
    s(102, "التكاثر", "At-Takaathur", "Competition", 8, Meccan),
    s(103, "العصر", "Al-Asr", "The Declining Day", 3, Meccan),
    s(104, "الهمزة", "Al-Humaza", "The Traducer", 9, Meccan),
    s(105, "الفيل", "Al-Fil", "The Elephant", 5, Meccan),
    s(106, "قريش", "Quraish", "Quraysh", 4, Meccan),
    s(107, "الماعون", "Al-Maa'un", "Almsgiving", 7, Meccan),
    s(108, "الكوثر", "Al-Kawthar", "Abundance", 3, Meccan),
    s(109, "الكافرون", "Al-Kaafiroon", "The Disbelievers", 6, Meccan),
    s(110, "النصر", "An-Nasr", "Divine Support", 3, Medinan),
    s(111, "المسد", "Al-Masad", "The Palm Fibre", 5, Meccan),
    s(112, "الإخلاص", "Al-Ikhlaas", "Sincerity", 4, Meccan),
    s(113, "الفلق", "Al-Falaq", "The Dawn", 5, Meccan),
    s(114, "الناس", "An-Naas", "Mankind", 6, Meccan),
];

pub fn surah(number: u16) -> Option<&'static Surah> {
    if number == 0 {
        return None;
    }
    SURAHS.get(number as usize - 1)
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '\'' | ' ' | '`'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Match by exact number, or by substring of the transliterated name,
/// the English meaning or the Arabic name.
pub fn search(query: &str) -> Vec<&'static Surah> {
    let query = query.trim();
    if query.is_empty() {
        return SURAHS.iter().collect();
    }
    if let Ok(n) = query.parse::<u16>() {
        return surah(n).into_iter().collect();
    }

    let needle = normalize(query);
    SURAHS
        .iter()
        .filter(|s| {
            normalize(s.name_en).contains(&needle)
                || normalize(s.translation_en).contains(&needle)
                || s.name_ar.contains(query)
        })
        .collect()
}

pub fn filter_by_revelation(revelation: RevelationType) -> Vec<&'static Surah> {
    SURAHS
        .iter()
        .filter(|s| s.revelation == revelation)
        .collect()
}

/// Global (mushaf-wide) number of the first ayah of a surah.
pub fn first_global_ayah(number: u16) -> Option<u32> {
    surah(number)?;
    let before: u32 = SURAHS[..number as usize - 1]
        .iter()
        .map(|s| s.verses as u32)
        .sum();
    Some(before + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_complete_and_ordered() {
        assert_eq!(SURAHS.len(), SURAH_COUNT as usize);
        for (i, s) in SURAHS.iter().enumerate() {
            assert_eq!(s.number as usize, i + 1);
        }
        let total: u32 = SURAHS.iter().map(|s| s.verses as u32).sum();
        assert_eq!(total, AYAH_COUNT);
    }

    #[test]
    fn revelation_split() {
        assert_eq!(filter_by_revelation(Meccan).len(), 86);
        assert_eq!(filter_by_revelation(Medinan).len(), 28);
    }

    #[test]
    fn lookup_bounds() {
        assert!(surah(0).is_none());
        assert!(surah(115).is_none());
        assert_eq!(surah(1).map(|s| s.name_en), Some("Al-Faatiha"));
        assert_eq!(surah(114).map(|s| s.verses), Some(6));
    }

    #[test]
    fn search_ignores_punctuation_and_case() {
        let hits = search("alkahf");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, 18);

        let hits = search("ANAAM");
        assert_eq!(hits[0].number, 6);
    }

    #[test]
    fn search_by_number_and_meaning() {
        assert_eq!(search("36")[0].name_en, "Yaseen");
        assert!(search("999").is_empty());
        let dawn: Vec<u16> = search("the dawn").iter().map(|s| s.number).collect();
        assert_eq!(dawn, vec![89, 113]);
    }

    #[test]
    fn search_arabic_and_empty() {
        assert_eq!(search("الملك")[0].number, 67);
        assert_eq!(search("  ").len(), 114);
    }

    #[test]
    fn global_ayah_offsets() {
        assert_eq!(first_global_ayah(1), Some(1));
        assert_eq!(first_global_ayah(2), Some(8));
        assert_eq!(first_global_ayah(114), Some(AYAH_COUNT - 5));
        assert_eq!(first_global_ayah(0), None);
    }
}
