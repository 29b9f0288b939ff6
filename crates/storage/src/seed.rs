use domain::{Milonga, Post};
use serde::Deserialize;

/// Mock dataset loaded once at startup.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub milongas: Vec<Milonga>,
}

impl SeedData {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
