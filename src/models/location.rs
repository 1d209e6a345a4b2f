use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Minutes east of UTC
    pub timezone_offset: i32,
    pub city: Option<String>,
    pub country: Option<String>,
}
