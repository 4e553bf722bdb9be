//! The optional configuration file.
//!
//! Everything in it can also be given on the command line, which takes precedence.

use crate::error::Result;
use crate::lyrics::DEFAULT_LANGUAGES;
use crate::model::AudioFormat;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the platform config directory holding `config.toml`.
const APP_DIR: &str = "tubetag";
const FILE_NAME: &str = "config.toml";

/// Default destination directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "./downloads";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: Option<PathBuf>,
    /// Kept as text so a bad value can be reported like a bad `--format`.
    pub format: Option<String>,
    pub create_lrc: Option<bool>,
    pub ffmpeg_location: Option<PathBuf>,
    pub yt_dlp_location: Option<PathBuf>,
    pub subtitle_languages: Option<Vec<String>>,
}

impl Config {
    /// `<config dir>/tubetag/config.toml`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    /// Loads the file at the default location, see [`Config::load_from`].
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory on this platform, using defaults");
                Self::default()
            }
        }
    }

    /// Loads the config file at `path`.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file is reported and
    /// ignored.
    pub fn load_from(path: &Path) -> Self {
        if !path.is_file() {
            debug!("No config file at {}", path.display());
            return Self::default();
        }

        match Self::parse_file(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                error!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The configured format, or flac.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::UnsupportedFormat`] for an unknown format name.
    pub fn format(&self) -> Result<AudioFormat> {
        match &self.format {
            Some(format) => format.parse(),
            None => Ok(AudioFormat::Flac),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn create_lrc(&self) -> bool {
        self.create_lrc.unwrap_or(false)
    }

    pub fn subtitle_languages(&self) -> Vec<String> {
        match &self.subtitle_languages {
            Some(languages) if !languages.is_empty() => languages.clone(),
            _ => DEFAULT_LANGUAGES.iter().map(|lang| lang.to_string()).collect(),
        }
    }
}
