//! Driving 'yt-dlp': the audio download and the subtitle-only pass.

use crate::deps::Libraries;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::model::{AudioFormat, VideoInfo};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// The host YouTube Music pages are served from.
const MUSIC_HOST: &str = "music.youtube.com";

/// Output template, the original title is kept as the file name.
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// A fetcher that uses 'yt-dlp' to download audio and 'ffmpeg' to transcode it.
#[derive(Clone, Debug)]
pub struct Youtube {
    /// The required libraries.
    pub libraries: Libraries,
    /// The directory where the audio (and temporary subtitles) will be written.
    pub output_dir: PathBuf,
}

/// The result of a successful download.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadedAudio {
    /// The info record printed by 'yt-dlp' after post-processing.
    pub info: VideoInfo,
    /// The transcoded audio file.
    pub path: PathBuf,
}

impl fmt::Display for Youtube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Youtube: yt-dlp={:?}, output_dir={:?}",
            self.libraries.youtube, self.output_dir
        )
    }
}

impl Youtube {
    /// Creates a new fetcher writing into `output_dir`, which is created if needed.
    pub fn new(libraries: Libraries, output_dir: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(output_dir.as_ref())?;

        Ok(Self {
            libraries,
            output_dir: output_dir.as_ref().to_path_buf(),
        })
    }

    fn output_template(&self) -> String {
        self.output_dir.join(OUTPUT_TEMPLATE).to_string_lossy().into_owned()
    }

    /// The arguments for downloading the best audio stream and transcoding it to `format`.
    pub fn download_args(&self, url: &str, format: AudioFormat) -> Vec<String> {
        let mut args = vec![
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            format.as_str().to_string(),
            "--audio-quality".to_string(),
            format.quality().to_string(),
            "--no-playlist".to_string(),
            "--embed-metadata".to_string(),
            "--no-warnings".to_string(),
            "--ffmpeg-location".to_string(),
            self.libraries.ffmpeg.to_string_lossy().into_owned(),
            "--output".to_string(),
            self.output_template(),
            "--dump-single-json".to_string(),
            "--no-simulate".to_string(),
        ];
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// The arguments for fetching only the subtitles of `lang`.
    pub fn subtitle_args(&self, url: &str, lang: &str) -> Vec<String> {
        let mut args = vec![
            "--skip-download".to_string(),
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            lang.to_string(),
            "--sub-format".to_string(),
            "vtt/srt/best".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--output".to_string(),
            self.output_template(),
        ];
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<String> {
        let executor = Executor {
            executable_path: self.libraries.youtube.clone(),
            args,
        };

        match executor.execute().await {
            Ok(output) => Ok(output.stdout),
            Err(Error::Command(message)) => Err(Error::Download(message)),
            Err(e) => Err(e),
        }
    }

    /// Downloads the audio of `url` and transcodes it to `format`.
    /// Be careful, this function may take a while to execute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Download`] when 'yt-dlp' fails, and [`Error::FileNotFound`] when the
    /// resolved audio file is not on disk afterwards.
    pub async fn download_audio(&self, url: &str, format: AudioFormat) -> Result<DownloadedAudio> {
        info!("Downloading: {}", url);

        let stdout = self.run(self.download_args(url, format)).await?;
        let info = VideoInfo::from_json(&stdout)?;
        info!("Download and conversion finished");

        let path = info.resolve_file_path(&self.output_dir, format);
        if !path.exists() {
            return Err(Error::FileNotFound(path));
        }

        info!("Audio file ready: {}", path.display());
        self.log_output_dir();

        Ok(DownloadedAudio { info, path })
    }

    /// Downloads the subtitles of `url` in `lang` next to the audio, without the media itself.
    pub async fn download_subtitles(&self, url: &str, lang: &str) -> Result<()> {
        debug!("Downloading {} subtitles for {}", lang, url);

        self.run(self.subtitle_args(url, lang)).await?;
        Ok(())
    }

    fn log_output_dir(&self) {
        let Ok(entries) = std::fs::read_dir(&self.output_dir) else {
            return;
        };

        debug!("Files in {}:", self.output_dir.display());
        for entry in entries.flatten() {
            debug!(" - {}", entry.file_name().to_string_lossy());
        }
    }
}

/// Returns true when the URL points at YouTube Music rather than a regular video page.
pub fn is_youtube_music(url: &str) -> bool {
    Url::parse(url.trim())
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_lowercase()))
        .is_some_and(|host| host.contains(MUSIC_HOST))
}

/// Shell scripts standing in for 'yt-dlp'.
#[cfg(all(test, unix))]
pub(crate) mod fake {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Writes an executable `yt-dlp` script running `body` into `dir`.
    pub fn extractor(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("yt-dlp");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(dir: &Path) -> Youtube {
        let libraries = Libraries::new(PathBuf::from("yt-dlp"), PathBuf::from("/opt/ffmpeg/ffmpeg"));
        Youtube::new(libraries, dir).unwrap()
    }

    #[test]
    fn detects_music_host() {
        assert!(is_youtube_music("https://music.youtube.com/watch?v=abc"));
        assert!(is_youtube_music("https://MUSIC.YouTube.com/watch?v=abc"));
        assert!(!is_youtube_music("https://www.youtube.com/watch?v=abc"));
        assert!(!is_youtube_music("https://youtu.be/abc?ref=music.youtube.com"));
        assert!(!is_youtube_music("not a url"));
    }

    #[test]
    fn creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        fetcher(&nested);
        assert!(nested.is_dir());
    }

    #[test]
    fn download_args_select_codec_and_quality() {
        let dir = tempfile::tempdir().unwrap();
        let args = fetcher(dir.path()).download_args("https://youtu.be/abc", AudioFormat::Mp3);

        let value_of = |flag: &str| {
            let index = args.iter().position(|arg| arg == flag).unwrap();
            args[index + 1].clone()
        };

        assert_eq!(value_of("--format"), "bestaudio/best");
        assert_eq!(value_of("--audio-format"), "mp3");
        assert_eq!(value_of("--audio-quality"), "320");
        assert_eq!(value_of("--ffmpeg-location"), "/opt/ffmpeg/ffmpeg");
        assert!(value_of("--output").ends_with("%(title)s.%(ext)s"));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn subtitle_args_request_a_single_language() {
        let dir = tempfile::tempdir().unwrap();
        let args = fetcher(dir.path()).subtitle_args("https://youtu.be/abc", "ja");
        let index = args.iter().position(|arg| arg == "--sub-langs").unwrap();

        assert_eq!(args[index + 1], "ja");
        assert!(args.contains(&"--skip-download".to_string()));
        assert_eq!(args[args.len() - 2], "--");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_extractor_is_a_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let libraries = Libraries::new(PathBuf::from("false"), PathBuf::from("ffmpeg"));
        let youtube = Youtube::new(libraries, dir.path()).unwrap();

        assert!(matches!(
            youtube.download_audio("https://youtu.be/abc", AudioFormat::Flac).await,
            Err(Error::Download(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_file_after_download_is_fatal() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let missing = out.path().join("Ghost.flac");
        let script = fake::extractor(
            bin.path(),
            &format!(r#"printf '%s' '{{"title": "Ghost", "filepath": "{}"}}'"#, missing.display()),
        );
        let youtube = Youtube::new(Libraries::new(script, PathBuf::from("ffmpeg")), out.path()).unwrap();

        match youtube.download_audio("https://youtu.be/abc", AudioFormat::Flac).await {
            Err(Error::FileNotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn download_returns_info_and_resolved_file() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let audio = out.path().join("Song.m4a");
        std::fs::write(&audio, b"audio").unwrap();
        let script = fake::extractor(
            bin.path(),
            &format!(
                r#"printf '%s' '{{"title": "Song", "requested_downloads": [{{"ext": "m4a", "filepath": "{}"}}]}}'"#,
                audio.display()
            ),
        );
        let youtube = Youtube::new(Libraries::new(script, PathBuf::from("ffmpeg")), out.path()).unwrap();

        let download = youtube
            .download_audio("https://youtu.be/abc", AudioFormat::Aac)
            .await
            .unwrap();
        assert_eq!(download.path, audio);
        assert_eq!(download.info.title.as_deref(), Some("Song"));
    }
}
