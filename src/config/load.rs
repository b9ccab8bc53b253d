use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;
use crate::error::MixError;

impl Settings {
    /// Load settings from an optional config file and the environment.
    ///
    /// `explicit` (from `--config`) takes the place of the resolved default
    /// path and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(::config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = resolve_config_path() {
                    builder =
                        builder.add_source(::config::File::from(path.as_path()).required(false));
                }
            }
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MIXVID")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), MixError> {
        if !(0.0..=1.0).contains(&self.waves.opacity) {
            return Err(MixError::Config(format!(
                "waves.opacity must be between 0.0 and 1.0, got {}",
                self.waves.opacity
            )));
        }
        if self.captions.size == 0 {
            return Err(MixError::Config("captions.size must be >= 1".to_string()));
        }
        if self.captions.window_secs == 0 {
            return Err(MixError::Config(
                "captions.window_secs must be >= 1".to_string(),
            ));
        }
        for (key, value) in [
            ("waves.color", &self.waves.color),
            ("captions.color", &self.captions.color),
            ("tools.ffmpeg", &self.tools.ffmpeg),
            ("tools.ffprobe", &self.tools.ffprobe),
        ] {
            if value.trim().is_empty() {
                return Err(MixError::Config(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Resolve the config path from `MIXVID_CONFIG_PATH` or XDG defaults.
/// An empty `MIXVID_CONFIG_PATH` counts as unset.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("MIXVID_CONFIG_PATH")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/mixvid/config.toml`, or `~/.config/mixvid/config.toml`.
/// A relative or empty `XDG_CONFIG_HOME` is ignored.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("mixvid").join("config.toml"))
}
