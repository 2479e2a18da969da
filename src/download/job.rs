use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::api::{AlbumDetails, SearchResult};

const WATCH_URL: &str = "https://music.youtube.com/watch?v=";

/// One unit of work: a catalog video id and where its audio should land
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadJob {
    pub video_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track_number: Option<u32>,
    pub track_total: Option<u32>,
    pub year: Option<u32>,
    /// Directory the file is written to (`<dir>/<artist>/<album>`)
    pub destination: PathBuf,
    /// Artwork to embed when tagging
    pub cover_url: Option<String>,
}

impl DownloadJob {
    pub fn url(&self) -> String {
        format!("{}{}", WATCH_URL, self.video_id)
    }

    /// Output file name template, e.g. `Michael Jackson - %(title)s.%(ext)s`
    pub fn output_template(&self) -> String {
        format!(
            "{} - %(title)s.%(ext)s",
            path_component(&self.artist).replace('%', "%%")
        )
    }
}

/// Plan the job for a single song search result
pub fn song_job(result: &SearchResult, output_dir: &Path, cover_url: Option<String>) -> DownloadJob {
    let artist = result.primary_artist().to_string();
    let album = result.album.clone().unwrap_or_else(|| result.title.clone());

    DownloadJob {
        video_id: result.id.clone(),
        title: result.title.clone(),
        destination: destination(output_dir, &artist, &album),
        artist,
        album,
        track_number: None,
        track_total: None,
        year: result.year,
        cover_url,
    }
}

/// Plan one job per available track of an album
pub fn album_jobs(
    album: &AlbumDetails,
    output_dir: &Path,
    cover_url: Option<String>,
) -> Vec<DownloadJob> {
    let artist = album.primary_artist().to_string();
    let destination = destination(output_dir, &artist, album.title());
    let track_total = album.track_total();

    album
        .tracks
        .iter()
        .map(|track| DownloadJob {
            video_id: track.video_id.clone(),
            title: track.title.clone(),
            artist: artist.clone(),
            album: album.title().to_string(),
            track_number: Some(track.number),
            track_total: Some(track_total),
            year: album.year,
            destination: destination.clone(),
            cover_url: cover_url.clone(),
        })
        .collect()
}

fn destination(output_dir: &Path, artist: &str, album: &str) -> PathBuf {
    output_dir
        .join(path_component(artist))
        .join(path_component(album))
}

/// Make a catalog name safe to use as a single path component
pub fn path_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            #[cfg(windows)]
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim().trim_end_matches('.');
    if cleaned.is_empty() || cleaned == "." {
        "Unknown".to_string()
    } else {
        cleaned.to_string()
    }
}
