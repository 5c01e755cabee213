//! User settings for rolodex-cli
//!
//! Manages user preferences including the audit failure policy and display
//! formats.

use serde::{Deserialize, Serialize};

use super::paths::RolodexPaths;
use crate::error::RolodexError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// User settings for rolodex-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Fail mutating operations when audit dispatch fails.
    ///
    /// Off by default: auditing is best-effort and failures are only logged.
    #[serde(default)]
    pub strict_audit: bool,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            strict_audit: false,
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, creating the file with defaults if missing
    pub fn load_or_create(paths: &RolodexPaths) -> Result<Self, RolodexError> {
        let settings_file = paths.settings_file();

        if settings_file.exists() {
            read_json(&settings_file)
        } else {
            let settings = Self::default();
            paths.ensure_directories()?;
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RolodexPaths) -> Result<(), RolodexError> {
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert!(!settings.strict_audit);
        assert_eq!(settings.date_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolodexPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert!(paths.settings_file().exists());
        assert!(!settings.strict_audit);

        // Second load reads the persisted file
        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(reloaded.schema_version, settings.schema_version);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolodexPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let mut settings = Settings::default();
        settings.strict_audit = true;
        settings.save(&paths).unwrap();

        let reloaded = Settings::load_or_create(&paths).unwrap();
        assert!(reloaded.strict_audit);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolodexPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        std::fs::write(paths.settings_file(), "{\"strict_audit\": true}").unwrap();

        let settings = Settings::load_or_create(&paths).unwrap();
        assert!(settings.strict_audit);
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.date_format, "%Y-%m-%d %H:%M:%S");
    }
}
