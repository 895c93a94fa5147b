use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    pub fn new() -> Result<Self> {
        let settings = load_settings_from(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
            warn!("設定檔讀取失敗，使用預設值: {e:#}");
            UserSettings::default()
        });

        Ok(Self { settings })
    }
}

pub fn load_settings_from(path: &Path) -> Result<UserSettings> {
    if !path.exists() {
        return Ok(UserSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))
}
