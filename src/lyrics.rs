//! Finding lyrics for a download, and writing them next to the audio.
//!
//! YouTube Music exposes lyrics (or at least a description) in the info record. Regular
//! videos don't, so their subtitles are downloaded and flattened to plain text instead.

use crate::error::Result;
use crate::model::{VideoInfo, non_empty};
use crate::youtube::{DownloadedAudio, Youtube};
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Subtitle languages tried in order when none are configured.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["ko", "ja", "en"];

/// Subtitle extensions looked for on disk, in order of preference.
const SUBTITLE_EXTENSIONS: [&str; 2] = ["vtt", "srt"];

/// Blocks of a WebVTT file that carry no spoken text.
const VTT_NON_CUE_BLOCKS: [&str; 4] = ["WEBVTT", "NOTE", "STYLE", "REGION"];

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("inline tag pattern is valid"));

/// Resolves lyrics for a downloaded track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LyricsResolver {
    /// Subtitle languages, first match wins.
    pub languages: Vec<String>,
}

impl Default for LyricsResolver {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|lang| lang.to_string()).collect(),
        }
    }
}

impl LyricsResolver {
    pub fn new(languages: Vec<String>) -> Self {
        Self { languages }
    }

    /// Returns the lyrics of the download, or `None` when there are none.
    ///
    /// Subtitle download failures are logged and treated as "no lyrics".
    pub async fn resolve(
        &self,
        youtube: &Youtube,
        download: &DownloadedAudio,
        url: &str,
        is_music: bool,
    ) -> Option<String> {
        if is_music {
            let lyrics = lyrics_from_metadata(&download.info);
            match &lyrics {
                Some(_) => info!("Extracted lyrics from YouTube Music"),
                None => info!("No lyrics found on YouTube Music"),
            }
            return lyrics;
        }

        let Some(lang) = self.select_language(&download.info) else {
            info!("No subtitles in a preferred language ({})", self.languages.join(", "));
            return None;
        };

        let page_url = non_empty(download.info.webpage_url.as_deref()).unwrap_or(url);
        if let Err(e) = youtube.download_subtitles(page_url, &lang).await {
            warn!("Failed to download subtitles: {}", e);
            return None;
        }

        let stems = subtitle_stems(download);
        let stems: Vec<&str> = stems.iter().map(String::as_str).collect();
        let Some(subtitle_path) = find_subtitle_file(&youtube.output_dir, &stems, &lang) else {
            info!("Subtitle file not found");
            return None;
        };

        match take_subtitle_text(&subtitle_path) {
            Ok(text) => {
                info!("Using {} subtitles as lyrics", lang);
                Some(text).filter(|text| !text.is_empty())
            }
            Err(e) => {
                warn!("Failed to read subtitles {}: {}", subtitle_path.display(), e);
                None
            }
        }
    }

    /// Picks the first preferred language with uploaded subtitles, then with automatic captions.
    pub fn select_language(&self, info: &VideoInfo) -> Option<String> {
        [&info.subtitles, &info.automatic_captions]
            .into_iter()
            .filter(|table| !table.is_empty())
            .find_map(|table| {
                self.languages
                    .iter()
                    .find(|lang| table.contains_key(lang.as_str()))
                    .cloned()
            })
    }
}

/// The `lyrics` field of the record, falling back to the description.
pub fn lyrics_from_metadata(info: &VideoInfo) -> Option<String> {
    non_empty(info.lyrics.as_deref())
        .or_else(|| non_empty(info.description.as_deref()))
        .map(str::to_string)
}

/// The base names the subtitle file may have: the audio file's own stem, which carries the
/// same sanitising 'yt-dlp' applied to the title, then the raw title.
fn subtitle_stems(download: &DownloadedAudio) -> Vec<String> {
    let mut stems = Vec::new();
    if let Some(stem) = download.path.file_stem() {
        stems.push(stem.to_string_lossy().into_owned());
    }

    let title = download.info.title_or_default().to_string();
    if !stems.contains(&title) {
        stems.push(title);
    }
    stems
}

/// Looks for `<stem>.<lang>.vtt`, then `<stem>.<lang>.srt`, in `dir`.
pub fn find_subtitle_file(dir: &Path, stems: &[&str], lang: &str) -> Option<PathBuf> {
    stems.iter().find_map(|stem| {
        SUBTITLE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}.{}", stem, lang, ext)))
            .find(|path| path.is_file())
    })
}

/// Reads a subtitle file as plain text and deletes it.
pub fn take_subtitle_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    let text = subtitle_to_text(&content);

    fs::remove_file(path)?;
    debug!("Removed subtitle file {}", path.display());

    Ok(text)
}

/// Strips WebVTT/SRT structure (headers, cue numbers, timecodes, inline tags) and keeps the
/// spoken lines. Repeated lines from rolling captions are collapsed.
pub fn subtitle_to_text(content: &str) -> String {
    let content = content.trim_start_matches('\u{feff}');
    let mut lines: Vec<String> = Vec::new();

    for block in blocks(content) {
        let first = block[0].trim_start();
        if VTT_NON_CUE_BLOCKS.iter().any(|keyword| first.starts_with(keyword)) {
            continue;
        }

        // Everything up to the timecode is the cue number or identifier.
        let text = match block.iter().position(|line| line.contains("-->")) {
            Some(index) => &block[index + 1..],
            None => &block[..],
        };

        for line in text {
            let cleaned = INLINE_TAG.replace_all(line, "");
            let cleaned = decode_entities(cleaned.trim());
            if cleaned.is_empty() || lines.last() == Some(&cleaned) {
                continue;
            }
            lines.push(cleaned);
        }
    }

    lines.join("\n").trim().to_string()
}

fn decode_entities(line: &str) -> String {
    line.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Splits subtitle text into blank-line separated blocks.
fn blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Writes the lyrics to `<audio stem>.lrc` next to the audio file, replacing any existing one.
pub fn save_lrc(audio_path: &Path, lyrics: &str) -> Result<PathBuf> {
    let lrc_path = audio_path.with_extension("lrc");
    fs::write(&lrc_path, lyrics)?;

    info!("Created lyrics file: {}", lrc_path.display());
    Ok(lrc_path)
}
