use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `public_yn` flag the lecture API attaches to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[serde(rename = "Y")]
    Public,
    #[serde(rename = "N")]
    Private,
    #[serde(other)]
    Unknown,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// One lecture as returned by the list endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "public_yn")]
    pub visibility: Visibility,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Lecture {
    /// Link to the lecture page: the record's own url, else the configured template.
    pub fn link(&self, template: &str) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => template.replace("{id}", &self.id.to_string()),
        }
    }
}
