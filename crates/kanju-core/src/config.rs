use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::KanjuError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub lines: Vec<ParseLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub default_line: String,
    #[serde(default)]
    pub open_in_browser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    crate::history::STORAGE_KEY.to_string()
}

/// A third-party parse service, addressed by appending the encoded video URL
/// to `template`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseLine {
    pub name: String,
    pub template: String,
}

impl ParseLine {
    pub fn player_url(&self, video_url: &str) -> String {
        kanju_parse::link::player_url(&self.template, video_url)
    }
}

impl AppConfig {
    /// Load config from the user config file, or built-in defaults if it doesn't exist.
    pub fn load() -> Result<Self, KanjuError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or built-in defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, KanjuError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let user_str =
            std::fs::read_to_string(path).map_err(|e| KanjuError::Config(e.to_string()))?;
        toml::from_str(&user_str).map_err(|e| KanjuError::Config(e.to_string()))
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), KanjuError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| KanjuError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pick a parse line: by name if given, else the configured default,
    /// else the first one.
    pub fn resolve_line(&self, name: Option<&str>) -> Result<&ParseLine, KanjuError> {
        let wanted = name.or_else(|| {
            let default = self.general.default_line.trim();
            (!default.is_empty()).then_some(default)
        });

        match wanted {
            Some(wanted) => self
                .lines
                .iter()
                .find(|l| l.name == wanted)
                .ok_or_else(|| KanjuError::Config(format!("unknown parse line: {wanted}"))),
            None => self
                .lines
                .first()
                .ok_or_else(|| KanjuError::Config("no parse lines configured".into())),
        }
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to an optional user platform table merged over the embedded one.
    pub fn platforms_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("platforms.toml"))
            .unwrap_or_else(|| PathBuf::from("platforms.toml"))
    }

    /// Directory holding the history store.
    pub fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "kanju")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_lines() -> AppConfig {
        let mut config = AppConfig::default();
        config.lines = vec![
            ParseLine {
                name: "one".into(),
                template: "https://one.example/?url=".into(),
            },
            ParseLine {
                name: "two".into(),
                template: "https://two.example/jx?v=".into(),
            },
        ];
        config
    }

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.history.storage_key, "videoHistory");
        assert!(config.general.default_line.is_empty());
        assert!(!config.general.open_in_browser);
        assert!(config.lines.is_empty());
    }

    #[test]
    fn test_partial_user_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [[lines]]
            name = "main"
            template = "https://main.example/?url="
            "#,
        )
        .unwrap();
        assert_eq!(config.history.storage_key, "videoHistory");
        assert_eq!(config.lines.len(), 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.lines.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = with_lines();
        config.general.default_line = "two".into();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.lines, config.lines);
        assert_eq!(loaded.general.default_line, "two");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general\nopen_in_browser = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(KanjuError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_line_order() {
        let mut config = with_lines();
        assert_eq!(config.resolve_line(None).unwrap().name, "one");
        assert_eq!(config.resolve_line(Some("two")).unwrap().name, "two");

        config.general.default_line = "two".into();
        assert_eq!(config.resolve_line(None).unwrap().name, "two");
        assert_eq!(config.resolve_line(Some("one")).unwrap().name, "one");
    }

    #[test]
    fn test_resolve_line_errors() {
        let config = with_lines();
        assert!(config.resolve_line(Some("three")).is_err());
        assert!(AppConfig::default().resolve_line(None).is_err());
    }

    #[test]
    fn test_line_player_url() {
        let config = with_lines();
        let line = config.resolve_line(Some("two")).unwrap();
        assert_eq!(
            line.player_url("https://v.qq.com/x/1.html"),
            "https://two.example/jx?v=https%3A%2F%2Fv.qq.com%2Fx%2F1.html"
        );
    }
}
