use serde::{Deserialize, Serialize};
use std::{env, fmt, path::Path, path::PathBuf};
use tracing::info;

/// A logged subject, e.g. one kind of action being scouted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub label: String,
    pub color: String,
}

/// A qualitative result attached to a category occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub suffix: String,
    pub weight: i64,
}

/// Position of one entry code inside the category x outcome grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryCode {
    pub category: usize,
    pub outcome: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub categories: Vec<Category>,
    pub outcomes: Vec<Outcome>,
    /// chrono format string used for the timestamp of each log line.
    pub timestamp_format: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        let category = |code: &str, color: &str| Category {
            code: code.to_string(),
            label: format!("Action {code}"),
            color: color.to_string(),
        };
        let outcome = |suffix: &str, weight| Outcome {
            suffix: suffix.to_string(),
            weight,
        };

        Self {
            categories: vec![
                category("A", "#3b82f6"),
                category("B", "#10b981"),
                category("V", "#f59e0b"),
                category("P", "#ef4444"),
            ],
            outcomes: vec![outcome("+", 10), outcome("=", 5), outcome("-", 0)],
            timestamp_format: "%-d/%-m/%Y %H:%M:%S".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, err) => write!(f, "failed to read config {}: {err}", path.display()),
            Self::Parse(path, err) => write!(f, "failed to parse config {}: {err}", path.display()),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, err) => Some(err),
            Self::Parse(_, err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl ScoutConfig {
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn code_len(&self) -> usize {
        self.categories.len() * self.outcomes.len()
    }

    pub fn entry_code(&self, entry: EntryCode) -> String {
        format!(
            "{}{}",
            self.categories[entry.category].code, self.outcomes[entry.outcome].suffix
        )
    }

    /// Every valid entry code, category-major then outcome order.
    pub fn entry_codes(&self) -> impl Iterator<Item = (EntryCode, String)> + '_ {
        (0..self.categories.len()).flat_map(move |category| {
            (0..self.outcomes.len()).map(move |outcome| {
                let entry = EntryCode { category, outcome };
                (entry, self.entry_code(entry))
            })
        })
    }

    pub fn parse_entry(&self, raw: &str) -> Option<EntryCode> {
        let raw = raw.trim();
        self.categories
            .iter()
            .enumerate()
            .filter_map(|(category, c)| raw.strip_prefix(c.code.as_str()).map(|rest| (category, rest)))
            .find_map(|(category, rest)| {
                self.outcomes
                    .iter()
                    .position(|o| o.suffix == rest)
                    .map(|outcome| EntryCode { category, outcome })
            })
    }

    pub fn weight_bounds(&self) -> (i64, i64) {
        let min = self.outcomes.iter().map(|o| o.weight).min().unwrap_or(0);
        let max = self.outcomes.iter().map(|o| o.weight).max().unwrap_or(0);
        (min, max)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("at least one category is required".into()));
        }
        if self.outcomes.is_empty() {
            return Err(ConfigError::Invalid("at least one outcome is required".into()));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(ConfigError::Invalid("timestamp_format must not be empty".into()));
        }

        for category in &self.categories {
            check_symbol("category code", &category.code)?;
            if category.color.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' has no color",
                    category.code
                )));
            }
        }
        for outcome in &self.outcomes {
            check_symbol("outcome suffix", &outcome.suffix)?;
        }

        let mut codes: Vec<String> = self.entry_codes().map(|(_, code)| code).collect();
        let categories: Vec<&str> = self.categories.iter().map(|c| c.code.as_str()).collect();
        let suffixes: Vec<&str> = self.outcomes.iter().map(|o| o.suffix.as_str()).collect();
        if has_duplicates(&categories) {
            return Err(ConfigError::Invalid("category codes must be unique".into()));
        }
        if has_duplicates(&suffixes) {
            return Err(ConfigError::Invalid("outcome suffixes must be unique".into()));
        }

        let total = codes.len();
        codes.sort();
        codes.dedup();
        if codes.len() != total {
            return Err(ConfigError::Invalid("entry codes must be unique".into()));
        }

        Ok(())
    }
}

fn check_symbol(kind: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{kind} must not be empty")));
    }
    if value.contains([';', '"']) || value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::Invalid(format!(
            "{kind} '{value}' must not contain ';', '\"' or whitespace"
        )));
    }
    Ok(())
}

fn has_duplicates(values: &[&str]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, value)| values[..i].contains(value))
}

pub fn resolve_config_path() -> Option<PathBuf> {
    env::var("APP_CONFIG_PATH").ok().map(PathBuf::from)
}

pub fn load_config(path: Option<&Path>) -> Result<ScoutConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
            let config: ScoutConfig = serde_json::from_slice(&bytes)
                .map_err(|err| ConfigError::Parse(path.to_path_buf(), err))?;
            info!("loaded scouting config from {}", path.display());
            config
        }
        None => ScoutConfig::default(),
    };

    config.validate()?;
    Ok(config)
}
