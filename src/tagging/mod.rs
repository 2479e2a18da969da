//! Metadata tagging of downloaded files.
//!
//! Tag writing is delegated to lofty behind the `tag` feature. Builds without
//! it have no tagger and leave downloads untagged.

mod cover;
#[cfg(feature = "tag")]
mod writer;

use std::path::Path;

use serde_json::Value;

pub use cover::pick_cover;
#[cfg(feature = "tag")]
pub use writer::LoftyTagger;

use crate::download::DownloadedTrack;
use crate::error::TagError;

/// Fields written into a file's tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track_number: Option<u32>,
    pub track_total: Option<u32>,
    pub year: Option<u32>,
    pub genre: Option<String>,
}

impl TrackTags {
    /// Catalog metadata from the job, completed with what the downloader reported
    pub fn from_download(track: &DownloadedTrack) -> Self {
        let job = &track.job;
        let info = &track.info;

        Self {
            title: job.title.clone(),
            artist: job.artist.clone(),
            album: job.album.clone(),
            track_number: job
                .track_number
                .or_else(|| info_u32(info, "track_number"))
                .or_else(|| info_u32(info, "playlist_index")),
            track_total: job.track_total.or_else(|| info_u32(info, "n_entries")),
            year: job.year.or_else(|| info_u32(info, "release_year")),
            genre: info
                .get("genre")
                .and_then(Value::as_str)
                .filter(|g| !g.is_empty())
                .map(str::to_string),
        }
    }
}

fn info_u32(info: &Value, key: &str) -> Option<u32> {
    info.get(key).and_then(Value::as_u64).map(|n| n as u32)
}

/// Writes tags into an audio file
pub trait Tagger: Send + Sync {
    fn tag(&self, path: &Path, tags: &TrackTags, cover: Option<&[u8]>) -> Result<(), TagError>;
}

/// The tagger compiled into this build, if any
pub fn default_tagger() -> Option<Box<dyn Tagger>> {
    #[cfg(feature = "tag")]
    {
        Some(Box::new(LoftyTagger))
    }

    #[cfg(not(feature = "tag"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::download::DownloadJob;

    fn track(track_number: Option<u32>, year: Option<u32>, info: Value) -> DownloadedTrack {
        DownloadedTrack {
            job: DownloadJob {
                video_id: "vid".to_string(),
                title: "Billie Jean".to_string(),
                artist: "Michael Jackson".to_string(),
                album: "Thriller".to_string(),
                track_number,
                track_total: None,
                year,
                destination: PathBuf::from("/music"),
                cover_url: None,
            },
            path: PathBuf::from("/music/a.m4a"),
            info,
        }
    }

    #[test]
    fn test_job_metadata_wins() {
        let tags = TrackTags::from_download(&track(
            Some(6),
            Some(1982),
            json!({ "track_number": 1, "release_year": 2001, "genre": "Pop" }),
        ));

        assert_eq!(tags.title, "Billie Jean");
        assert_eq!(tags.track_number, Some(6));
        assert_eq!(tags.year, Some(1982));
        assert_eq!(tags.genre.as_deref(), Some("Pop"));
    }

    #[test]
    fn test_info_fills_gaps() {
        let tags = TrackTags::from_download(&track(
            None,
            None,
            json!({ "playlist_index": 4, "n_entries": 9, "release_year": 1982 }),
        ));

        assert_eq!(tags.track_number, Some(4));
        assert_eq!(tags.track_total, Some(9));
        assert_eq!(tags.year, Some(1982));
        assert!(tags.genre.is_none());
    }

    #[test]
    fn test_empty_genre_is_ignored() {
        let tags = TrackTags::from_download(&track(None, None, json!({ "genre": "" })));
        assert!(tags.genre.is_none());
    }

    #[test]
    fn test_default_tagger_matches_features() {
        assert_eq!(default_tagger().is_some(), cfg!(feature = "tag"));
    }
}
