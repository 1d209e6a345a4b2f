use crate::models::{Dua, DuaCategory};

/// Builtin collection; used as-is when no remote collection is configured.
pub static DUAS: &[Dua] = &[
    Dua {
        id: 1,
        category: DuaCategory::Morning,
        title: "Upon waking up",
        arabic: "الْحَمْدُ لِلَّهِ الَّذِي أَحْيَانَا بَعْدَ مَا أَمَاتَنَا وَإِلَيْهِ النُّشُورُ",
        transliteration: "Alhamdu lillahil-ladhi ahyana ba'da ma amatana wa ilayhin-nushur",
        translation: "All praise is for Allah who gave us life after having taken it from us, and unto Him is the resurrection.",
        reference: Some("Sahih al-Bukhari 6312"),
    },
    Dua {
        id: 2,
        category: DuaCategory::Morning,
        title: "Morning remembrance",
        arabic: "أَصْبَحْنَا وَأَصْبَحَ الْمُلْكُ لِلَّهِ، وَالْحَمْدُ لِلَّهِ",
        transliteration: "Asbahna wa asbahal-mulku lillah, walhamdu lillah",
        translation: "We have reached the morning and at this very time the whole kingdom belongs to Allah, and all praise is for Allah.",
        reference: Some("Sahih Muslim 2723"),
    },
    Dua {
        id: 3,
        category: DuaCategory::Evening,
        title: "Evening remembrance",
        arabic: "أَمْسَيْنَا وَأَمْسَى الْمُلْكُ لِلَّهِ، وَالْحَمْدُ لِلَّهِ",
        transliteration: "Amsayna wa amsal-mulku lillah, walhamdu lillah",
        translation: "We have reached the evening and at this very time the whole kingdom belongs to Allah, and all praise is for Allah.",
        reference: Some("Sahih Muslim 2723"),
    },
    Dua {
        id: 4,
        category: DuaCategory::Evening,
        title: "Seeking refuge in the evening",
        arabic: "أَعُوذُ بِكَلِمَاتِ اللَّهِ التَّامَّاتِ مِنْ شَرِّ مَا خَلَقَ",
        transliteration: "A'udhu bikalimatil-lahit-tammati min sharri ma khalaq",
        translation: "I seek refuge in the perfect words of Allah from the evil of what He has created.",
        reference: Some("Sahih Muslim 2709"),
    },
    Dua {
        id: 5,
        category: DuaCategory::Prayer,
        title: "Opening supplication",
        arabic: "سُبْحَانَكَ اللَّهُمَّ وَبِحَمْدِكَ، وَتَبَارَكَ اسْمُكَ، وَتَعَالَى جَدُّكَ، وَلَا إِلَهَ غَيْرُكَ",
        transliteration: "Subhanakal-lahumma wa bihamdika, wa tabarakas-muka, wa ta'ala jadduka, wa la ilaha ghayruk",
        translation: "How perfect You are O Allah, and I praise You. Blessed is Your name and lofty is Your position, and none has the right to be worshipped except You.",
        reference: Some("Sunan Abi Dawud 775"),
    },
    Dua {
        id: 6,
        category: DuaCategory::Prayer,
        title: "After the salah",
        arabic: "اللَّهُمَّ أَعِنِّي عَلَى ذِكْرِكَ وَشُكْرِكَ وَحُسْنِ عِبَادَتِكَ",
        transliteration: "Allahumma a'inni 'ala dhikrika wa shukrika wa husni 'ibadatik",
        translation: "O Allah, help me to remember You, to give You thanks, and to worship You well.",
        reference: Some("Sunan Abi Dawud 1522"),
    },
    Dua {
        id: 7,
        category: DuaCategory::Travel,
        title: "Supplication for travel",
        arabic: "سُبْحَانَ الَّذِي سَخَّرَ لَنَا هَذَا وَمَا كُنَّا لَهُ مُقْرِنِينَ وَإِنَّا إِلَى رَبِّنَا لَمُنْقَلِبُونَ",
        transliteration: "Subhanal-ladhi sakhkhara lana hadha wa ma kunna lahu muqrinin, wa inna ila rabbina lamunqalibun",
        translation: "How perfect He is, the One who has placed this at our service, and we ourselves would not have been capable of that, and to our Lord is our final destiny.",
        reference: Some("Quran 43:13-14"),
    },
    Dua {
        id: 8,
        category: DuaCategory::Food,
        title: "Before eating",
        arabic: "بِسْمِ اللَّهِ",
        transliteration: "Bismillah",
        translation: "In the name of Allah.",
        reference: Some("Sunan Abi Dawud 3767"),
    },
    Dua {
        id: 9,
        category: DuaCategory::Food,
        title: "After eating",
        arabic: "الْحَمْدُ لِلَّهِ الَّذِي أَطْعَمَنِي هَذَا وَرَزَقَنِيهِ مِنْ غَيْرِ حَوْلٍ مِنِّي وَلَا قُوَّةٍ",
        transliteration: "Alhamdu lillahil-ladhi at'amani hadha wa razaqanihi min ghayri hawlin minni wa la quwwah",
        translation: "All praise is for Allah who fed me this and provided it for me without any might or power from myself.",
        reference: Some("Jami' at-Tirmidhi 3458"),
    },
    Dua {
        id: 10,
        category: DuaCategory::Sleep,
        title: "Before sleeping",
        arabic: "بِاسْمِكَ اللَّهُمَّ أَمُوتُ وَأَحْيَا",
        transliteration: "Bismika Allahumma amutu wa ahya",
        translation: "In Your name O Allah, I live and die.",
        reference: Some("Sahih al-Bukhari 6324"),
    },
    Dua {
        id: 11,
        category: DuaCategory::Protection,
        title: "Protection from all harm",
        arabic: "بِسْمِ اللَّهِ الَّذِي لَا يَضُرُّ مَعَ اسْمِهِ شَيْءٌ فِي الْأَرْضِ وَلَا فِي السَّمَاءِ وَهُوَ السَّمِيعُ الْعَلِيمُ",
        transliteration: "Bismillahil-ladhi la yadurru ma'asmihi shay'un fil-ardi wa la fis-sama'i wa huwas-sami'ul-'alim",
        translation: "In the name of Allah, with whose name nothing on earth or in heaven can cause harm, and He is the All-Hearing, the All-Knowing.",
        reference: Some("Sunan Abi Dawud 5088"),
    },
    Dua {
        id: 12,
        category: DuaCategory::Protection,
        title: "Leaving the home",
        arabic: "بِسْمِ اللَّهِ، تَوَكَّلْتُ عَلَى اللَّهِ، وَلَا حَوْلَ وَلَا قُوَّةَ إِلَّا بِاللَّهِ",
        transliteration: "Bismillah, tawakkaltu 'alallah, wa la hawla wa la quwwata illa billah",
        translation: "In the name of Allah, I place my trust in Allah, and there is no might nor power except with Allah.",
        reference: Some("Sunan Abi Dawud 5095"),
    },
    Dua {
        id: 13,
        category: DuaCategory::Forgiveness,
        title: "Sayyid al-Istighfar",
        arabic: "اللَّهُمَّ أَنْتَ رَبِّي لَا إِلَهَ إِلَّا أَنْتَ، خَلَقْتَنِي وَأَنَا عَبْدُكَ، وَأَنَا عَلَى عَهْدِكَ وَوَعْدِكَ مَا اسْتَطَعْتُ",
        transliteration: "Allahumma anta rabbi la ilaha illa ant, khalaqtani wa ana 'abduk, wa ana 'ala 'ahdika wa wa'dika mastata't",
        translation: "O Allah, You are my Lord, none has the right to be worshipped except You. You created me and I am Your servant, and I abide by Your covenant and promise as best I can.",
        reference: Some("Sahih al-Bukhari 6306"),
    },
    Dua {
        id: 14,
        category: DuaCategory::Forgiveness,
        title: "Seeking forgiveness",
        arabic: "أَسْتَغْفِرُ اللَّهَ وَأَتُوبُ إِلَيْهِ",
        transliteration: "Astaghfirullaha wa atubu ilayh",
        translation: "I seek the forgiveness of Allah and repent to Him.",
        reference: Some("Sahih al-Bukhari 6307"),
    },
    Dua {
        id: 15,
        category: DuaCategory::Quranic,
        title: "Good in this world and the next",
        arabic: "رَبَّنَا آتِنَا فِي الدُّنْيَا حَسَنَةً وَفِي الْآخِرَةِ حَسَنَةً وَقِنَا عَذَابَ النَّارِ",
        transliteration: "Rabbana atina fid-dunya hasanatan wa fil-akhirati hasanatan wa qina 'adhaban-nar",
        translation: "Our Lord, give us good in this world and good in the Hereafter, and protect us from the punishment of the Fire.",
        reference: Some("Quran 2:201"),
    },
    Dua {
        id: 16,
        category: DuaCategory::Quranic,
        title: "Increase in knowledge",
        arabic: "رَبِّ زِدْنِي عِلْمًا",
        transliteration: "Rabbi zidni 'ilma",
        translation: "My Lord, increase me in knowledge.",
        reference: Some("Quran 20:114"),
    },
    Dua {
        id: 17,
        category: DuaCategory::Quranic,
        title: "Steadfast hearts",
        arabic: "رَبَّنَا لَا تُزِغْ قُلُوبَنَا بَعْدَ إِذْ هَدَيْتَنَا وَهَبْ لَنَا مِنْ لَدُنْكَ رَحْمَةً إِنَّكَ أَنْتَ الْوَهَّابُ",
        transliteration: "Rabbana la tuzigh qulubana ba'da idh hadaytana wa hab lana min ladunka rahmah, innaka antal-wahhab",
        translation: "Our Lord, let not our hearts deviate after You have guided us, and grant us mercy from Yourself. Indeed, You are the Bestower.",
        reference: Some("Quran 3:8"),
    },
    Dua {
        id: 18,
        category: DuaCategory::General,
        title: "For parents",
        arabic: "رَبِّ ارْحَمْهُمَا كَمَا رَبَّيَانِي صَغِيرًا",
        transliteration: "Rabbir-hamhuma kama rabbayani saghira",
        translation: "My Lord, have mercy upon them as they brought me up when I was small.",
        reference: Some("Quran 17:24"),
    },
    Dua {
        id: 19,
        category: DuaCategory::General,
        title: "In times of distress",
        arabic: "حَسْبُنَا اللَّهُ وَنِعْمَ الْوَكِيلُ",
        transliteration: "Hasbunallahu wa ni'mal-wakil",
        translation: "Allah is sufficient for us, and He is the best disposer of affairs.",
        reference: Some("Quran 3:173"),
    },
    Dua {
        id: 20,
        category: DuaCategory::General,
        title: "Entering the masjid",
        arabic: "اللَّهُمَّ افْتَحْ لِي أَبْوَابَ رَحْمَتِكَ",
        transliteration: "Allahummaf-tah li abwaba rahmatik",
        translation: "O Allah, open the gates of Your mercy for me.",
        reference: Some("Sahih Muslim 713"),
    },
];

pub fn find(id: u32) -> Option<&'static Dua> {
    DUAS.iter().find(|d| d.id == id)
}

pub fn by_category(category: DuaCategory) -> Vec<&'static Dua> {
    DUAS.iter().filter(|d| d.category == category).collect()
}

/// Categories that have at least one dua, in display order.
pub fn categories() -> Vec<(DuaCategory, usize)> {
    DuaCategory::all()
        .into_iter()
        .map(|c| (c, by_category(c).len()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<u32> = DUAS.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), DUAS.len());
    }

    #[test]
    fn every_category_is_populated() {
        assert_eq!(categories().len(), DuaCategory::all().len());
    }

    #[test]
    fn find_and_filter() {
        assert_eq!(find(15).map(|d| d.reference), Some(Some("Quran 2:201")));
        assert!(find(0).is_none());
        assert!(by_category(DuaCategory::Sleep)
            .iter()
            .all(|d| d.category == DuaCategory::Sleep));
    }
}
