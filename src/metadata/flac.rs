//! FLAC: Vorbis comments and a PICTURE block.

use super::{COVER_DESCRIPTION, Field, TagRecord};
use crate::error::{Error, Result};
use crate::thumbnail::Cover;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::read_from_path;
use lofty::tag::{ItemKey, Tag, TagExt, TagType};
use log::debug;
use std::path::Path;

/// Vorbis field name of the description. lofty has no generic key mapping to it.
const DESCRIPTION_KEY: &str = "DESCRIPTION";

fn item_key(field: Field) -> ItemKey {
    match field {
        Field::Artist => ItemKey::TrackArtist,
        Field::Title => ItemKey::TrackTitle,
        Field::Album => ItemKey::AlbumTitle,
        Field::Genre => ItemKey::Genre,
        Field::Date => ItemKey::RecordingDate,
        Field::TrackNumber => ItemKey::TrackNumber,
        Field::Description => ItemKey::Unknown(DESCRIPTION_KEY.to_string()),
        Field::Lyrics => ItemKey::Lyrics,
    }
}

/// Writes the record into the Vorbis comments, replacing every picture with the cover.
pub fn write(file_path: &Path, record: &TagRecord, cover: Option<&Cover>) -> Result<()> {
    let mut tagged_file = read_from_path(file_path)?;

    if tagged_file.tag(TagType::VorbisComments).is_none() {
        debug!("No Vorbis comments found, creating them");
        tagged_file.insert_tag(Tag::new(TagType::VorbisComments));
    }
    let Some(tag) = tagged_file.tag_mut(TagType::VorbisComments) else {
        return Err(Error::UnsupportedTag("Vorbis comments".to_string()));
    };

    for (field, value) in record.text_fields() {
        tag.insert_text(item_key(field), value.to_string());
    }

    if let Some(cover) = cover {
        while tag.picture_count() > 0 {
            tag.remove_picture(0);
        }
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::from_str(&cover.mime_type)),
            Some(COVER_DESCRIPTION.to_string()),
            cover.data.clone(),
        ));
    }

    tag.save_to_path(file_path, WriteOptions::default())?;
    Ok(())
}
