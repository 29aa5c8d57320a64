//! Project metadata parsed from the `meta` file

use crate::error::ConfigError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Keys every project must define
pub const REQUIRED_KEYS: [&str; 3] = ["title", "author", "language"];

/// Book metadata as `key = value` pairs
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ProjectMeta {
    entries: BTreeMap<String, String>,
}

impl ProjectMeta {
    /// Parse the `key = value` line format.
    ///
    /// Blank lines are skipped. Every other line must contain exactly one `=`;
    /// keys and values are trimmed. A value may be empty.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(ConfigError::MalformedLine {
                    line_number: index + 1,
                    line: line.to_string(),
                });
            };

            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        for key in REQUIRED_KEYS {
            if !entries.contains_key(key) {
                return Err(ConfigError::MissingKey(key));
            }
        }

        Ok(Self { entries })
    }

    /// Look up an arbitrary key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn title(&self) -> &str {
        self.get("title").unwrap_or_default()
    }

    pub fn author(&self) -> &str {
        self.get("author").unwrap_or_default()
    }

    pub fn language(&self) -> &str {
        self.get("language").unwrap_or_default()
    }
}
