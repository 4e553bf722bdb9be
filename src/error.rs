//! The errors that can occur.

use std::path::PathBuf;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The possible errors that can occur.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred while interacting with the file system.
    #[error("An IO error occurred: {0}")]
    IO(#[from] std::io::Error),
    /// An error occurred while fetching a file.
    #[error("An error occurred while fetching: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("The server answered with status {0}")]
    Http(reqwest::StatusCode),
    /// An error occurred while parsing JSON.
    #[error("An error occurred while parsing JSON: {0}")]
    Serde(#[from] serde_json::Error),
    /// An error occurred while parsing the configuration file.
    #[error("Malformed config file: {0}")]
    Config(#[from] toml::de::Error),
    /// An error occurred while decoding or encoding an image.
    #[error("An error occurred while processing an image: {0}")]
    Image(#[from] image::ImageError),

    /// An error occurred while reading or writing FLAC/WAV tags.
    #[error("Failed to read or write tags: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
    /// An error occurred while reading or writing ID3 tags.
    #[error("Failed to read or write ID3 tags: {0}")]
    Id3(#[from] id3::Error),
    /// An error occurred while reading or writing MP4 atoms.
    #[error("Failed to read or write MP4 tags: {0}")]
    Mp4(#[from] mp4ameta::Error),

    /// A required executable could not be found.
    #[error("{0} was not found. Install it and add it to PATH, or pass its location explicitly")]
    MissingDependency(String),
    /// The file cannot hold the tag container its format calls for.
    #[error("The file cannot hold {0} tags")]
    UnsupportedTag(String),
    /// An error occurred while running a command.
    #[error("Failed to execute command: {0}")]
    Command(String),
    /// The extractor reported a download failure.
    #[error("Download failed: {0}")]
    Download(String),
    /// The downloaded file is not where the extractor said it would be.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// The requested audio format is not one of the supported formats.
    #[error("Unsupported audio format: {0} (supported: mp3, aac, flac, wav, m4a)")]
    UnsupportedFormat(String),
}
