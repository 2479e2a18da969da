use std::io::Cursor;
use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::picture::{Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};

use crate::error::TagError;
use crate::tagging::{Tagger, TrackTags};

/// Tag writer backed by lofty.
///
/// Writes into the file's primary tag format (MP4 ilst for m4a, ID3v2 for
/// mp3, Vorbis comments for opus/flac), creating the tag when missing.
pub struct LoftyTagger;

impl Tagger for LoftyTagger {
    fn tag(&self, path: &Path, tags: &TrackTags, cover: Option<&[u8]>) -> Result<(), TagError> {
        let read_error = |e: lofty::error::LoftyError| TagError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut tagged_file = Probe::open(path)
            .map_err(read_error)?
            .read()
            .map_err(read_error)?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| TagError::Write {
                path: path.to_path_buf(),
                reason: format!("no {:?} tag available", tag_type),
            })?;

        tag.set_title(tags.title.clone());
        tag.set_artist(tags.artist.clone());
        tag.set_album(tags.album.clone());

        if let Some(number) = tags.track_number {
            tag.set_track(number);
        }
        if let Some(total) = tags.track_total {
            tag.set_track_total(total);
        }
        if let Some(year) = tags.year {
            tag.set_year(year);
        }
        if let Some(ref genre) = tags.genre {
            tag.set_genre(genre.clone());
        }

        if let Some(bytes) = cover {
            match Picture::from_reader(&mut Cursor::new(bytes)) {
                Ok(mut picture) => {
                    picture.set_pic_type(PictureType::CoverFront);
                    tag.remove_picture_type(PictureType::CoverFront);
                    tag.push_picture(picture);
                }
                // Unknown image formats are skipped, the text fields still get written
                Err(e) => tracing::warn!("Skipping cover for {}: {}", path.display(), e),
            }
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| TagError::Write {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::info!("Tagged {}", path.display());

        Ok(())
    }
}
