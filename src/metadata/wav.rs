//! WAV: a RIFF INFO list with the artist and title.
//!
//! INFO chunks have no place for pictures or long text, so the rest of the record is dropped.

use super::{Field, TagRecord};
use crate::error::{Error, Result};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::read_from_path;
use lofty::tag::{Accessor, Tag, TagExt, TagType};
use std::path::Path;

pub fn write(file_path: &Path, record: &TagRecord) -> Result<()> {
    let mut tagged_file = read_from_path(file_path)?;

    let tag = match tagged_file.tag_mut(TagType::RiffInfo) {
        Some(tag) => tag,
        None => {
            tagged_file.insert_tag(Tag::new(TagType::RiffInfo));
            tagged_file
                .tag_mut(TagType::RiffInfo)
                .ok_or_else(|| Error::UnsupportedTag("RIFF INFO".to_string()))?
        }
    };

    for (field, value) in record.text_fields() {
        match field {
            Field::Artist => tag.set_artist(value.to_string()),
            Field::Title => tag.set_title(value.to_string()),
            Field::Album
            | Field::Genre
            | Field::Date
            | Field::TrackNumber
            | Field::Description
            | Field::Lyrics => {}
        }
    }

    tag.save_to_path(file_path, WriteOptions::default())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{fixtures, write_tags};
    use crate::model::AudioFormat;
    use image::ImageFormat;

    #[test]
    fn only_artist_and_title_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Song.wav");
        std::fs::write(&path, fixtures::wav()).unwrap();

        // The cover is silently ignored for WAV.
        write_tags(
            &path,
            AudioFormat::Wav,
            &fixtures::record(),
            Some(&fixtures::cover(ImageFormat::Png)),
        );

        let tagged_file = read_from_path(&path).unwrap();
        let tag = tagged_file.tag(TagType::RiffInfo).unwrap();
        assert_eq!(tag.artist().as_deref(), Some("Artist"));
        assert_eq!(tag.title().as_deref(), Some("타이틀 Title"));
        assert_eq!(tag.album(), None);
        assert_eq!(tag.genre(), None);
        assert_eq!(tag.picture_count(), 0);
    }

    #[test]
    fn not_a_wav_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Song.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        assert!(write(&path, &fixtures::record()).is_err());
    }
}
