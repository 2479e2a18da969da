mod media;
mod parse;
mod ytmusic;

use async_trait::async_trait;

#[cfg(test)]
pub use media::AlbumTrack;
pub use media::{AlbumDetails, SearchKind, SearchResult, Thumbnail};
pub use ytmusic::YtMusicClient;

use crate::error::ApiError;

/// Catalog lookup used by the download pipeline.
///
/// `YtMusicClient` is the production implementation; tests substitute fakes.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Search for albums or songs, in the order the service ranks them
    async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<SearchResult>, ApiError>;

    /// Resolve an album and its track list
    async fn album(&self, browse_id: &str) -> Result<AlbumDetails, ApiError>;

    /// Artwork of the album best matching `album` by `artist`
    async fn album_thumbnails(&self, album: &str, artist: &str)
        -> Result<Vec<Thumbnail>, ApiError>;

    /// Download image bytes
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}
