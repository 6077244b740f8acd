use crate::infrastructure::bluetooth::protocol;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_false")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_true")]
    pub show_file_line: bool,
    #[serde(default = "default_false")]
    pub show_thread_ids: bool,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_true(),
            console_logging_enabled: default_false(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            show_file_line: default_true(),
            show_thread_ids: default_false(),
            show_target: default_true(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "wiimote_sync".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    // Discovery
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    #[serde(default = "default_pass_delay_ms")]
    pub pass_delay_ms: u64,
    /// Inquiry length in units of 1.28 seconds
    #[serde(default = "default_inquiry_timeout_multiplier")]
    pub inquiry_timeout_multiplier: u8,
    #[serde(default = "default_name_patterns")]
    pub name_patterns: Vec<String>,

    // Logging Settings
    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_passes: default_max_passes(),
            pass_delay_ms: default_pass_delay_ms(),
            inquiry_timeout_multiplier: default_inquiry_timeout_multiplier(),
            name_patterns: default_name_patterns(),
            log_settings: LogSettings::default(),
        }
    }
}

fn default_max_passes() -> u32 {
    protocol::MAX_DISCOVERY_PASSES
}
fn default_pass_delay_ms() -> u64 {
    protocol::PASS_DELAY_MS
}
fn default_inquiry_timeout_multiplier() -> u8 {
    protocol::INQUIRY_TIMEOUT_MULTIPLIER
}
fn default_name_patterns() -> Vec<String> {
    protocol::NAME_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

pub struct SettingsService {
    settings: SyncSettings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::from_path(settings_path))
    }

    /// Loads settings from an explicit file, falling back to defaults if it is missing or invalid
    pub fn from_path(settings_path: PathBuf) -> Self {
        let settings = Self::load_from_file(&settings_path).unwrap_or_default();
        Self {
            settings,
            settings_path,
        }
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("WiimoteSync");
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<SyncSettings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn get(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut SyncSettings {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("wiimote_sync_test_{}_{}", name, std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let settings = SyncSettings::default();
        assert_eq!(settings.max_passes, 3);
        assert_eq!(settings.pass_delay_ms, 500);
        assert_eq!(settings.inquiry_timeout_multiplier, 3);
        assert_eq!(settings.name_patterns, vec!["RVL-CNT", "RVL-WBC"]);
        assert!(!settings.log_settings.console_logging_enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: SyncSettings = serde_json::from_str(r#"{ "max_passes": 5 }"#).unwrap();
        assert_eq!(settings.max_passes, 5);
        assert_eq!(settings.pass_delay_ms, 500);
        assert_eq!(settings.log_settings.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let service = SettingsService::from_path(scratch_path("missing"));
        assert_eq!(service.get().max_passes, 3);
    }

    #[test]
    fn test_save_and_reload() {
        let path = scratch_path("reload");
        let mut service = SettingsService::from_path(path.clone());
        service.get_mut().pass_delay_ms = 750;
        service.save().unwrap();

        let reloaded = SettingsService::from_path(path.clone());
        assert_eq!(reloaded.get().pass_delay_ms, 750);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
