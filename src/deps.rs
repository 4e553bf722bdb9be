//! Locating the external binaries the pipeline depends on.

use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// The located libraries.
///
/// # Examples
///
/// ```rust,no_run
/// # use tubetag::deps::Libraries;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let libraries = Libraries::locate(None, None)?;
/// println!("ffmpeg: {}", libraries.ffmpeg.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Libraries {
    /// The path to the yt-dlp binary.
    pub youtube: PathBuf,
    /// The path to the ffmpeg binary.
    pub ffmpeg: PathBuf,
}

impl Libraries {
    pub fn new(youtube: PathBuf, ffmpeg: PathBuf) -> Self {
        Self { youtube, ffmpeg }
    }

    /// Finds 'yt-dlp' and 'ffmpeg', either at the given locations or on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDependency`] when one of them cannot be found. Nothing else
    /// is touched, so this can run before any network or file activity.
    pub fn locate(youtube: Option<&Path>, ffmpeg: Option<&Path>) -> Result<Self> {
        let youtube = find_executable("yt-dlp", youtube)?;
        let ffmpeg = find_executable("ffmpeg", ffmpeg)?;

        debug!("Using yt-dlp at {:?} and ffmpeg at {:?}", youtube, ffmpeg);
        Ok(Self::new(youtube, ffmpeg))
    }
}

/// Resolves an executable from an explicit location or from `PATH`.
///
/// An explicit location may point at the binary itself or at the directory holding it.
pub fn find_executable(name: &str, location: Option<&Path>) -> Result<PathBuf> {
    match location {
        Some(location) if location.is_dir() => {
            which::which_in(name, Some(location), location)
                .map_err(|_| Error::MissingDependency(format!("{} (in {})", name, location.display())))
        }
        Some(location) if location.is_file() => Ok(location.to_path_buf()),
        Some(location) => Err(Error::MissingDependency(format!(
            "{} (at {})",
            name,
            location.display()
        ))),
        None => which::which(name).map_err(|_| Error::MissingDependency(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("ffmpeg-custom");
        std::fs::write(&binary, b"").unwrap();

        assert_eq!(find_executable("ffmpeg", Some(&binary)).unwrap(), binary);
    }

    #[test]
    fn missing_explicit_location_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").join("ffmpeg");

        assert!(matches!(
            find_executable("ffmpeg", Some(&missing)),
            Err(Error::MissingDependency(_))
        ));
    }

    #[test]
    fn unknown_binary_is_not_on_path() {
        assert!(matches!(
            find_executable("tubetag-no-such-transcoder", None),
            Err(Error::MissingDependency(name)) if name == "tubetag-no-such-transcoder"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn directory_location_is_searched() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("ffmpeg");
        std::fs::write(&binary, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(find_executable("ffmpeg", Some(dir.path())).unwrap(), binary);
    }
}
