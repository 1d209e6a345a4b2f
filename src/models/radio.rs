use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioStation {
    pub id: u32,
    pub name: String,
    pub url: String,
}
