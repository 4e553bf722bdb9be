//! MP3: ID3v2.4 frames.

use super::{COVER_DESCRIPTION, Field, TagRecord};
use crate::error::Result;
use crate::thumbnail::Cover;
use id3::frame::{Comment, Lyrics, Picture, PictureType};
use id3::{ErrorKind, Tag as ID3Tag, TagLike, Version as ID3Version};
use log::debug;
use std::path::Path;

/// Language of the comment and lyrics frames.
const FRAME_LANGUAGE: &str = "eng";

/// Writes the record as ID3 frames, creating a tag when the file has none yet.
pub fn write(file_path: &Path, record: &TagRecord, cover: Option<&Cover>) -> Result<()> {
    let mut tag = match ID3Tag::read_from_path(file_path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => {
            debug!("No ID3 tag found in {:?}, creating one", file_path);
            ID3Tag::new()
        }
        Err(e) => return Err(e.into()),
    };

    for (field, value) in record.text_fields() {
        match field {
            Field::Artist => tag.set_artist(value),
            Field::Title => tag.set_title(value),
            Field::Album => tag.set_album(value),
            Field::Genre => tag.set_genre(value),
            Field::Date => tag.set_text("TDRC", value),
            Field::TrackNumber => tag.set_text("TRCK", value),
            Field::Description => {
                tag.add_frame(Comment {
                    lang: FRAME_LANGUAGE.to_string(),
                    description: "Description".to_string(),
                    text: value.to_string(),
                });
            }
            Field::Lyrics => {
                tag.add_frame(Lyrics {
                    lang: FRAME_LANGUAGE.to_string(),
                    description: "Lyrics".to_string(),
                    text: value.to_string(),
                });
            }
        }
    }

    if let Some(cover) = cover {
        tag.add_frame(Picture {
            mime_type: cover.mime_type.clone(),
            picture_type: PictureType::CoverFront,
            description: COVER_DESCRIPTION.to_string(),
            data: cover.data.clone(),
        });
    }

    tag.write_to_path(file_path, ID3Version::Id3v24)?;
    Ok(())
}
