// Settings file module
// Parses `.env` style KEY=value files and maps known keys onto config paths

use std::path::Path;

use crate::error::AppError;

/// Settings file keys and the configuration paths they override
const KEY_PATHS: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASS", "database.password"),
    ("CORS_ORIGIN", "http.cors_origin"),
];

/// Parsed settings file, in file order (a repeated key keeps its last value)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    entries: Vec<(String, String)>,
}

impl Settings {
    /// Read and parse a settings file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::SettingsFileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| AppError::SettingsFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, AppError> {
        let mut entries: Vec<(String, String)> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let malformed = || AppError::MalformedSetting {
                line: index + 1,
                content: trimmed.to_string(),
            };
            let (key, value) = trimmed.split_once('=').ok_or_else(malformed)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed());
            }

            entries.retain(|(k, _)| k != key);
            entries.push((key.to_string(), clean_value(value)));
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Configuration overrides for every known key present in the file
    pub fn config_overrides(&self) -> Vec<(&'static str, &str)> {
        KEY_PATHS
            .iter()
            .filter_map(|(key, path)| self.get(key).map(|value| (*path, value)))
            .collect()
    }

    /// Keys present in the file that map to nothing
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| !KEY_PATHS.iter().any(|(known, _)| known == k))
            .collect()
    }
}

/// Strip trailing `;`, then surrounding whitespace and quotes
fn clean_value(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(';')
        .trim_matches(|c: char| c.is_whitespace() || c == '\0' || c == '\'' || c == '"')
        .to_string()
}
