//! AAC/M4A: iTunes-style MP4 atoms.

use super::{Field, TagRecord};
use crate::error::Result;
use crate::thumbnail::Cover;
use log::warn;
use mp4ameta::{Img, ImgFmt, Tag as MP4Tag};
use std::path::Path;

/// Writes the record into the `ilst` atoms, replacing any existing artwork with the cover.
pub fn write(file_path: &Path, record: &TagRecord, cover: Option<&Cover>) -> Result<()> {
    let mut tag = MP4Tag::read_from_path(file_path)?;

    for (field, value) in record.text_fields() {
        match field {
            Field::Artist => tag.set_artist(value),
            Field::Title => tag.set_title(value),
            Field::Album => tag.set_album(value),
            Field::Genre => tag.set_genre(value),
            Field::Date => tag.set_year(value),
            Field::TrackNumber => match value.trim().parse::<u16>() {
                Ok(number) => tag.set_track_number(number),
                Err(_) => warn!("Ignoring non-numeric track number {:?}", value),
            },
            Field::Lyrics => tag.set_lyrics(value),
            Field::Description => {}
        }
    }

    if let Some(cover) = cover {
        let fmt = match cover.mime_type.as_str() {
            "image/jpeg" => ImgFmt::Jpeg,
            _ => ImgFmt::Png,
        };
        tag.set_artwork(Img::new(fmt, cover.data.clone()));
    }

    tag.write_to_path(file_path)?;
    Ok(())
}
