//! User settings, stored as TOML.
//!
//! The settings file lives in the platform config folder:
//! - macOS: ~/Library/Application Support/org.conlang-honing.Conlang-Honing/
//! - Windows: %APPDATA%/conlang-honing/Conlang Honing/config/
//! - Linux: ~/.config/conlanghoning/
//!
//! `--config <PATH>` replaces that location for a single run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use honing_core::{ChangeOptions, DEFAULT_BATCH_LIMIT, PruneMode, SpeechSpeed};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "conlang-honing";
const APP_NAME: &str = "Conlang Honing";
const CONFIG_FILENAME: &str = "settings.toml";

/// Application settings (persisted to disk as TOML).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub changes: ChangeSettings,
    pub history: HistorySettings,
    pub speech: SpeechSettings,
}

/// Limits on phoneme changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeSettings {
    /// Largest batch accepted at once; 0 lifts the limit.
    pub max_batch_size: usize,
}

impl Default for ChangeSettings {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_BATCH_LIMIT,
        }
    }
}

impl ChangeSettings {
    pub fn batch_limit(&self) -> Option<usize> {
        (self.max_batch_size > 0).then_some(self.max_batch_size)
    }

    /// Engine options for these settings.
    pub fn options(&self) -> ChangeOptions {
        ChangeOptions::default().with_batch_limit(self.batch_limit())
    }
}

/// Change history housekeeping on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Trim every entry's history to its newest change before saving.
    pub prune_on_save: bool,
    /// Also clear history nested in the kept snapshot.
    pub deep_prune: bool,
}

impl HistorySettings {
    /// Pruning to run before a save, if any.
    pub fn prune_on_save(&self) -> Option<PruneMode> {
        self.prune_on_save.then(|| self.prune_mode())
    }

    pub fn prune_mode(&self) -> PruneMode {
        if self.deep_prune {
            PruneMode::Deep
        } else {
            PruneMode::KeepLatest
        }
    }
}

/// eSpeak-NG rendering defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub default_speed: SpeechSpeed,
    /// Program name or full path of the eSpeak-NG executable.
    pub espeak_ng_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_voice: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            default_speed: SpeechSpeed::default(),
            espeak_ng_path: PathBuf::from("espeak-ng"),
            default_voice: None,
        }
    }
}

/// Get the path to the settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Resolve the settings file for this run.
pub fn resolve_settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(settings_path)
}

/// Load settings from `explicit`, or from the platform location.
///
/// Returns default settings if the file is missing, unreadable or
/// unparseable.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let Some(path) = resolve_settings_path(explicit) else {
        tracing::warn!("Could not determine settings path, using defaults");
        return Settings::default();
    };

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "Failed to parse settings file, using defaults"
                );
                Settings::default()
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            if explicit.is_some() {
                tracing::warn!(path = %path.display(), "Settings file not found, using defaults");
            } else {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
            }
            Settings::default()
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                %error,
                "Failed to read settings file, using defaults"
            );
            Settings::default()
        }
    }
}

/// Save settings, creating the parent directory if needed.
pub fn save_settings(settings: &Settings, explicit: Option<&Path>) -> Result<PathBuf> {
    let path = resolve_settings_path(explicit)
        .ok_or_else(|| anyhow!("could not determine settings path"))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(settings).context("serialize settings")?;
    fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;

    tracing::info!(path = %path.display(), "Saved settings");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_exists() {
        assert!(settings_path().is_some());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.changes.batch_limit(), Some(DEFAULT_BATCH_LIMIT));
        assert_eq!(settings.history.prune_on_save(), None);
        assert_eq!(settings.speech.default_speed, SpeechSpeed::Medium);
    }

    #[test]
    fn test_zero_batch_size_lifts_limit() {
        let changes = ChangeSettings { max_batch_size: 0 };
        assert_eq!(changes.batch_limit(), None);
        assert_eq!(changes.options().batch_limit, None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            "[history]\nprune_on_save = true\ndeep_prune = true\n\n[speech]\ndefault_speed = \"x-slow\"\n",
        )
        .unwrap();

        assert_eq!(settings.history.prune_on_save(), Some(PruneMode::Deep));
        assert_eq!(settings.speech.default_speed, SpeechSpeed::XSlow);
        assert_eq!(settings.changes, ChangeSettings::default());
        assert_eq!(settings.speech.espeak_ng_path, PathBuf::from("espeak-ng"));
    }

    #[test]
    fn test_settings_round_trip() {
        let mut settings = Settings::default();
        settings.changes.max_batch_size = 4;
        settings.speech.default_voice = Some("en-us".to_string());

        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, settings);
    }
}
