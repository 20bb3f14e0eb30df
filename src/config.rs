use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Tunables for the aggregation and overview panels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Departments shown individually in the distribution chart; the rest
    /// collapse into `other_label`.
    pub top_departments: usize,
    pub other_label: String,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_departments: 6,
            other_label: "Other".to_string(),
            preview_rows: 5,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing dashboard config")
    }

    /// Read `path` if it exists; defaults otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// [`DashboardConfig::load`] that logs and falls back to defaults on error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json_str(r#"{ "top_departments": 4 }"#).unwrap();
        assert_eq!(config.top_departments, 4);
        assert_eq!(config.other_label, "Other");
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(DashboardConfig::from_json_str(r#"{ "top": 4 }"#).is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert_eq!(
            DashboardConfig::load_or_default(file.path()),
            DashboardConfig::default()
        );
    }
}
