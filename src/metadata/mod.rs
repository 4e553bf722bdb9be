//! Metadata management for downloaded files.
//!
//! A [`TagRecord`] is built once from the info record, then handed to the writer of the
//! requested format. Every writer works on the file's native tag container and never
//! touches the audio payload.

use crate::model::{AudioFormat, VideoInfo, non_empty};
use crate::thumbnail::Cover;
use log::{error, info};
use std::path::Path;

pub mod flac;
pub mod mp3;
pub mod mp4;
pub mod wav;

/// Description given to embedded cover pictures.
pub(crate) const COVER_DESCRIPTION: &str = "Thumbnail";

/// A text field of a [`TagRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Artist,
    Title,
    Album,
    Genre,
    Date,
    TrackNumber,
    Description,
    Lyrics,
}

/// The tags written to a downloaded file, with defaults already substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRecord {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub genre: String,
    pub date: String,
    pub track_number: String,
    pub description: String,
    /// The thumbnail URL the cover is made from.
    pub thumbnail: Option<String>,
    pub lyrics: String,
}

impl TagRecord {
    /// Builds the record from the info record and the resolved lyrics.
    pub fn from_info(info: &VideoInfo, lyrics: Option<&str>) -> Self {
        let field = |value: &Option<String>| non_empty(value.as_deref()).map(str::to_string);

        Self {
            artist: field(&info.artist)
                .or_else(|| field(&info.uploader))
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            title: field(&info.title).unwrap_or_else(|| "Unknown Title".to_string()),
            album: field(&info.album)
                .or_else(|| field(&info.playlist_title))
                .unwrap_or_else(|| "Unknown Album".to_string()),
            genre: field(&info.genre).unwrap_or_else(|| "Unknown Genre".to_string()),
            date: field(&info.release_date)
                .or_else(|| field(&info.upload_date))
                .unwrap_or_default(),
            track_number: field(&info.track_number).unwrap_or_default(),
            description: field(&info.description).unwrap_or_default(),
            thumbnail: field(&info.thumbnail),
            lyrics: lyrics.unwrap_or_default().to_string(),
        }
    }

    /// The text fields that are set, in a stable order.
    pub fn text_fields(&self) -> Vec<(Field, &str)> {
        [
            (Field::Artist, self.artist.as_str()),
            (Field::Title, self.title.as_str()),
            (Field::Album, self.album.as_str()),
            (Field::Genre, self.genre.as_str()),
            (Field::Date, self.date.as_str()),
            (Field::TrackNumber, self.track_number.as_str()),
            (Field::Description, self.description.as_str()),
            (Field::Lyrics, self.lyrics.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
    }
}

/// Writes `record` (and `cover`, if any) into the file with the tag container of `format`.
///
/// Failures are logged, never returned: a file without tags is still a usable download.
pub fn write_tags(file_path: &Path, format: AudioFormat, record: &TagRecord, cover: Option<&Cover>) {
    let result = match format {
        AudioFormat::Flac => flac::write(file_path, record, cover),
        AudioFormat::Mp3 => mp3::write(file_path, record, cover),
        AudioFormat::Aac | AudioFormat::M4a => mp4::write(file_path, record, cover),
        AudioFormat::Wav => wav::write(file_path, record),
    };

    match result {
        Ok(()) => info!(
            "{} metadata applied to {}",
            format.as_str().to_uppercase(),
            file_path.display()
        ),
        Err(e) => error!(
            "Failed to write {} metadata: {}",
            format.as_str().to_uppercase(),
            e
        ),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_substitutes_defaults() {
        let record = TagRecord::from_info(&VideoInfo::default(), None);

        assert_eq!(record.artist, "Unknown Artist");
        assert_eq!(record.title, "Unknown Title");
        assert_eq!(record.album, "Unknown Album");
        assert_eq!(record.genre, "Unknown Genre");
        assert_eq!(record.date, "");
        assert_eq!(record.track_number, "");
        assert_eq!(record.thumbnail, None);
        assert_eq!(
            record.text_fields(),
            vec![
                (Field::Artist, "Unknown Artist"),
                (Field::Title, "Unknown Title"),
                (Field::Album, "Unknown Album"),
                (Field::Genre, "Unknown Genre"),
            ]
        );
    }

    #[test]
    fn record_prefers_music_fields() {
        let info = VideoInfo {
            artist: Some("A".to_string()),
            uploader: Some("Channel".to_string()),
            album: None,
            playlist_title: Some("Playlist".to_string()),
            release_date: Some("20200101".to_string()),
            upload_date: Some("20240101".to_string()),
            track_number: Some("3".to_string()),
            ..Default::default()
        };

        let record = TagRecord::from_info(&info, Some("L1"));
        assert_eq!(record.artist, "A");
        assert_eq!(record.album, "Playlist");
        assert_eq!(record.date, "20200101");
        assert_eq!(record.track_number, "3");
        assert_eq!(record.lyrics, "L1");
    }

    #[test]
    fn uploader_stands_in_for_missing_artist() {
        let info = VideoInfo {
            artist: Some(" ".to_string()),
            uploader: Some("Channel".to_string()),
            upload_date: Some("20240101".to_string()),
            ..Default::default()
        };

        let record = TagRecord::from_info(&info, None);
        assert_eq!(record.artist, "Channel");
        assert_eq!(record.date, "20240101");
    }

    #[test]
    fn unknown_format_is_rejected_before_tagging() {
        assert!("ogg".parse::<AudioFormat>().is_err());
        assert!("opus".parse::<AudioFormat>().is_err());
    }

    #[test]
    fn tag_failure_does_not_panic_or_touch_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Song.m4a");
        let payload = b"ADTS bytes, no atoms here".to_vec();
        std::fs::write(&path, &payload).unwrap();

        write_tags(&path, AudioFormat::M4a, &fixtures::record(), None);

        assert_eq!(std::fs::read(&path).unwrap(), payload);
    }
}
