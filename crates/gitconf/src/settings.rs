use gitconf_syntax::ParserOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file at {settings_path}: {source}")]
    SettingsReadError {
        settings_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file at {settings_path}: {source}")]
    SettingsParseError {
        settings_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {source}")]
    SettingsSerializeError { source: toml::ser::Error },

    #[error("Failed to write settings file at {settings_path}: {source}")]
    SettingsWriteError {
        settings_path: PathBuf,
        source: std::io::Error,
    },
}

/// Tunables for reading gitconfig files, stored as TOML.
///
/// ```toml
/// [parser]
/// initial_capacity = 256
/// require_full_input = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub parser: ParserOptions,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_from_path<P: AsRef<Path>>(settings_path: P) -> Result<Option<Self>, SettingsError> {
        let settings_path = settings_path.as_ref();
        if !settings_path.exists() {
            log::debug!("no settings at {}", settings_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(settings_path).map_err(|source| {
            SettingsError::SettingsReadError {
                settings_path: settings_path.to_path_buf(),
                source,
            }
        })?;

        let settings =
            Self::from_toml_str(&content).map_err(|source| SettingsError::SettingsParseError {
                settings_path: settings_path.to_path_buf(),
                source,
            })?;

        Ok(Some(settings))
    }

    pub fn load() -> Result<Option<Self>, SettingsError> {
        let settings_path = Self::settings_path();
        Self::load_from_path(&settings_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, settings_path: P) -> Result<(), SettingsError> {
        let settings_path = settings_path.as_ref();
        let write_error = |source| SettingsError::SettingsWriteError {
            settings_path: settings_path.to_path_buf(),
            source,
        };

        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|source| SettingsError::SettingsSerializeError { source })?;
        std::fs::write(settings_path, content).map_err(write_error)?;
        Ok(())
    }

    pub fn settings_path() -> PathBuf {
        let settings_dir = shellexpand::tilde("~/.config/gitconf");
        PathBuf::from(settings_dir.as_ref()).join("settings.toml")
    }
}
