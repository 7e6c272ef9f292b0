//! CLI configuration: TOML file, then environment, then flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chatlens_analytics::AnalyticsConfig;
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "chatlens.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter string, e.g. `"warn"` or `"chatlens_parser=debug"`.
    pub level: String,
    /// Emit log records as newline-delimited JSON.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Resolve the configuration for one run.
    ///
    /// An explicit `path` must exist; the implicit `chatlens.toml` is only
    /// read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env(&mut self) {
        self.log.level = env_or("CHATLENS_LOG", &self.log.level);
        self.log.json = std::env::var("CHATLENS_LOG_JSON")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(self.log.json);
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [log]
            json = true

            [analytics]
            top_words = 5
            extra_stop_words = ["lol"]
            "#,
        )
        .unwrap();
        assert!(config.log.json);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.analytics.top_words, 5);
        assert_eq!(config.analytics.extra_stop_words, vec!["lol"]);
        assert_eq!(config.analytics.histogram_bins, 30);
        assert!(config
            .analytics
            .media_markers
            .contains(&"<Media omitted>".to_string()));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(Config::from_toml("[analytics]\ntop_words = \"many\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/chatlens.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
