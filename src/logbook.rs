use crate::config::{EntryCode, ScoutConfig};
use crate::models::KeyValueStore;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

pub const LOG_KEY: &str = "zeppLoggerLog";
pub const FIELD_DELIMITER: char = ';';

/// Append-only log text, one `<timestamp>;<entry code>` line per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Logbook {
    text: String,
}

impl Logbook {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Missing key means an empty log.
    pub fn load(store: &KeyValueStore) -> Self {
        Self::new(store.get(LOG_KEY).unwrap_or_default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().filter(|line| !line.trim().is_empty()).count()
    }

    pub fn append(&mut self, config: &ScoutConfig, entry: EntryCode) -> String {
        self.append_at(config, entry, Local::now())
    }

    pub fn append_at<Tz>(&mut self, config: &ScoutConfig, entry: EntryCode, when: DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let line = format_line(config, entry, when);
        self.text.push_str(&line);
        line
    }

    /// Wipes the log only when the caller confirmed; returns whether it did.
    pub fn clear(&mut self, confirmed: bool) -> bool {
        if confirmed {
            self.text.clear();
        }
        confirmed
    }

    pub fn write_to(&self, store: &mut KeyValueStore) {
        store.set(LOG_KEY, self.text.clone());
    }
}

/// Renders one newline-terminated log line.
pub fn format_line<Tz>(config: &ScoutConfig, entry: EntryCode, when: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}{FIELD_DELIMITER}{}\n",
        when.format(&config.timestamp_format),
        config.entry_code(entry)
    )
}
