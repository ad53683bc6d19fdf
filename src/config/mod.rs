use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::theme;

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The raw restaurant list exactly as typed, one name per line.
    /// This is the only thing that persists between runs.
    #[serde(default)]
    pub saved_list: String,

    /// Fetch the AI comment after a spin
    #[serde(default = "default_true")]
    pub comments_enabled: bool,

    /// Desktop notification when a winner lands
    #[serde(default = "default_true")]
    pub notifications: bool,

    /// Gemini model id for the comment call
    #[serde(default = "default_model")]
    pub model: String,

    /// Wheel segment color overrides as hex strings ("#RRGGBB" or "#RGB").
    /// Empty means the built-in palette.
    #[serde(default)]
    pub palette: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            saved_list: String::new(),
            comments_enabled: true,
            notifications: true,
            model: default_model(),
            palette: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("ruretto");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(&self.cleaned())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Copy with junk stripped: trailing blank lines in the list, palette
    /// entries that are not valid hex colors, an empty model id.
    fn cleaned(&self) -> Self {
        let mut clean = self.clone();

        while clean.saved_list.ends_with('\n') || clean.saved_list.ends_with(' ') {
            clean.saved_list.pop();
        }

        clean.palette.retain(|c| theme::parse_hex_color(c).is_some());

        if clean.model.trim().is_empty() {
            clean.model = default_model();
        }

        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            saved_list: "Katsu House\nPho 99\nTaqueria".to_string(),
            comments_enabled: true,
            notifications: false,
            model: "gemini-3-flash-preview".to_string(),
            palette: vec!["#F43F5E".to_string()],
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.saved_list, deserialized.saved_list);
        assert_eq!(config.model, deserialized.model);
        assert_eq!(config.palette, deserialized.palette);
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.saved_list.is_empty());
        assert!(config.comments_enabled);
        assert!(config.notifications);
        assert_eq!(config.model, "gemini-3-flash-preview");
    }

    #[test]
    fn test_cleaned_strips_junk() {
        let config = AppConfig {
            saved_list: "a\nb\n\n  \n".to_string(),
            palette: vec!["#fff".to_string(), "garbage".to_string()],
            model: "  ".to_string(),
            ..AppConfig::default()
        };

        let clean = config.cleaned();
        assert_eq!(clean.saved_list, "a\nb");
        assert_eq!(clean.palette, vec!["#fff".to_string()]);
        assert_eq!(clean.model, "gemini-3-flash-preview");
    }
}
