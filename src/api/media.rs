use serde::{Deserialize, Serialize};

/// Kind of catalog entry being searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchKind {
    Album,
    Song,
}

impl SearchKind {
    /// Get a display label for the kind
    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::Album => "album",
            SearchKind::Song => "song",
        }
    }

    /// Search filter parameter understood by the YouTube Music web client
    pub(crate) fn filter_params(&self) -> &'static str {
        match self {
            SearchKind::Album => "EgWKAQIYAWoMEA4QChADEAQQCRAF",
            SearchKind::Song => "EgWKAQIIAWoMEA4QChADEAQQCRAF",
        }
    }
}

/// Thumbnail image as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One entry of a search result list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: SearchKind,
    pub title: String,
    pub artists: Vec<String>,
    /// `browseId` for albums, `videoId` for songs
    pub id: String,
    /// Album the song belongs to (songs only)
    pub album: Option<String>,
    pub year: Option<u32>,
    pub thumbnails: Vec<Thumbnail>,
}

impl SearchResult {
    /// Artist used for directories, file names and tags
    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ARTIST)
    }

    /// All artists joined for display
    pub fn artist_display(&self) -> String {
        if self.artists.is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            self.artists.join(", ")
        }
    }

    /// Menu line, e.g. "Michael Jackson - Thriller (1982)"
    pub fn display_line(&self) -> String {
        match self.year {
            Some(year) => format!("{} - {} ({})", self.artist_display(), self.title, year),
            None => format!("{} - {}", self.artist_display(), self.title),
        }
    }
}

/// A track on an album page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub video_id: String,
    pub title: String,
    /// 1-based position on the album
    pub number: u32,
}

/// Album details resolved from a `browseId`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumDetails {
    pub browse_id: String,
    /// `None` when the page header could not be read
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub year: Option<u32>,
    pub audio_playlist_id: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub tracks: Vec<AlbumTrack>,
}

impl AlbumDetails {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_ALBUM)
    }

    /// Fill whatever the album page did not provide from the picked search result
    pub fn fill_gaps(&mut self, result: &SearchResult) {
        if self.title.is_none() {
            self.title = Some(result.title.clone());
        }
        if self.artists.is_empty() {
            self.artists = result.artists.clone();
        }
        if self.year.is_none() {
            self.year = result.year;
        }
    }

    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ARTIST)
    }

    /// Total number of tracks on the album, counting unavailable ones
    pub fn track_total(&self) -> u32 {
        self.tracks
            .iter()
            .map(|t| t.number)
            .max()
            .unwrap_or(0)
            .max(self.tracks.len() as u32)
    }

    /// Playlist URL for the whole album
    pub fn playlist_url(&self) -> Option<String> {
        self.audio_playlist_id
            .as_ref()
            .map(|id| format!("https://music.youtube.com/playlist?list={}", id))
    }
}

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
