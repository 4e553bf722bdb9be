//! The models used to represent the data returned by 'yt-dlp'.
//!
//! Nothing in the info record is guaranteed, every field is optional and consumers
//! substitute their own defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The info record printed by 'yt-dlp' once the download and post-processing are done.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoInfo {
    /// The ID of the video.
    pub id: Option<String>,
    /// The title of the video.
    pub title: Option<String>,
    /// The artist, only filled in for music tracks.
    pub artist: Option<String>,
    /// The channel display name.
    pub uploader: Option<String>,
    /// The album, only filled in for music tracks.
    pub album: Option<String>,
    /// The title of the playlist the video was extracted from.
    pub playlist_title: Option<String>,
    pub genre: Option<String>,
    /// The release date, `YYYYMMDD`.
    pub release_date: Option<String>,
    /// The upload date, `YYYYMMDD`.
    pub upload_date: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub track_number: Option<String>,
    pub description: Option<String>,
    /// Lyrics, YouTube Music exposes them for some tracks.
    pub lyrics: Option<String>,
    /// The thumbnail URL of the video, usually the highest quality.
    pub thumbnail: Option<String>,
    /// The canonical URL of the video page.
    pub webpage_url: Option<String>,

    /// The subtitles uploaded by the author, keyed by language.
    #[serde(deserialize_with = "null_as_default")]
    pub subtitles: HashMap<String, Vec<Caption>>,
    /// The automatic captions of the video, keyed by language.
    #[serde(deserialize_with = "null_as_default")]
    pub automatic_captions: HashMap<String, Vec<Caption>>,

    /// The files produced for this request.
    #[serde(deserialize_with = "null_as_default")]
    pub requested_downloads: Vec<RequestedDownload>,
    pub filepath: Option<String>,
    pub path: Option<String>,
}

/// A caption track entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Caption {
    /// The extension of the caption file, e.g. 'vtt'.
    pub ext: Option<String>,
    /// The URL of the caption file.
    pub url: Option<String>,
    /// The language of the caption file, e.g. 'English'.
    pub name: Option<String>,
}

/// A file produced by a download request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestedDownload {
    pub ext: Option<String>,
    pub filepath: Option<String>,
}

impl VideoInfo {
    /// Parses the JSON printed by 'yt-dlp -J'.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json.trim())?)
    }

    /// Returns the title, or the placeholder 'yt-dlp' itself would write.
    pub fn title_or_default(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or("Unknown_Title")
    }

    /// Resolves the path of the final audio file.
    ///
    /// Looks first at the requested downloads with the matching extension, then at the
    /// path fields of the record, and finally rebuilds it from the title.
    pub fn resolve_file_path(&self, output_dir: &std::path::Path, format: AudioFormat) -> PathBuf {
        let requested = self
            .requested_downloads
            .iter()
            .filter(|download| download.ext.as_deref() == Some(format.extension()))
            .find_map(|download| non_empty(download.filepath.as_deref()));

        if let Some(path) = requested {
            return PathBuf::from(path);
        }

        if let Some(path) =
            non_empty(self.filepath.as_deref()).or_else(|| non_empty(self.path.as_deref()))
        {
            return PathBuf::from(path);
        }

        output_dir.join(format!("{}.{}", self.title_or_default(), format.extension()))
    }
}

/// Treats empty strings the same way as missing values.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(value)) => Some(value.to_string()),
        Some(Raw::Float(value)) => Some(value.to_string()),
        Some(Raw::Text(value)) => Some(value),
        None => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The audio formats the transcoder can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Aac,
    Flac,
    Wav,
    M4a,
}

impl AudioFormat {
    /// Every supported format, in the order they are listed to the user.
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Aac,
        AudioFormat::Flac,
        AudioFormat::Wav,
        AudioFormat::M4a,
    ];

    /// The codec name, also used as the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "wav",
            AudioFormat::M4a => "m4a",
        }
    }

    /// The extension of the file the transcoder writes. 'yt-dlp' puts AAC in an `.m4a` file.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Aac => "m4a",
            other => other.as_str(),
        }
    }

    /// The quality passed to the transcoder, a bitrate in kbps or `0` for the best VBR / lossless.
    pub fn quality(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "320",
            AudioFormat::Aac | AudioFormat::M4a => "256",
            AudioFormat::Flac | AudioFormat::Wav => "0",
        }
    }

    /// Whether the tag container of this format can hold a cover picture.
    pub fn embeds_cover(&self) -> bool {
        !matches!(self, AudioFormat::Wav)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        AudioFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == lowered)
            .ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}
