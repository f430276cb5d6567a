use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat string-to-string store persisted as one JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeyValueStore {
    pub entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClearRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClearForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub text: String,
    pub lines: usize,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub line: String,
    pub category: String,
    pub label: String,
    pub color: String,
    pub score: String,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: bool,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CodeCount {
    pub code: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub label: String,
    pub total: u64,
    pub score: String,
    pub score_value: Option<f64>,
    pub percent: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub counts: Vec<CodeCount>,
    pub categories: Vec<CategorySummary>,
    pub grand_total: u64,
}
