use crate::models::RadioStation;

/// Used when the station directory cannot be fetched.
const FALLBACK: &[(u32, &str, &str)] = &[
    (1, "Mishary Alafasi", "https://backup.qurango.net/radio/mishary_alafasi"),
    (2, "Abdulbasit Abdulsamad (Mujawwad)", "https://backup.qurango.net/radio/abdulbasit_abdulsamad_mojawwad"),
    (3, "Saad Al-Ghamdi", "https://backup.qurango.net/radio/saad_alghamdi"),
    (4, "Maher Al-Muaiqly", "https://backup.qurango.net/radio/maher"),
];

pub fn fallback_stations() -> Vec<RadioStation> {
    FALLBACK
        .iter()
        .map(|(id, name, url)| RadioStation {
            id: *id,
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect()
}
