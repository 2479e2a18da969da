//! Extraction of search results and album pages from YouTube Music web
//! client responses.
//!
//! The documents are deeply nested renderer trees. Only the handful of fields
//! the downloader needs are pulled out; everything else is ignored.

use serde_json::Value;

use crate::api::media::{AlbumDetails, AlbumTrack, SearchKind, SearchResult, Thumbnail};
use crate::error::ApiError;

const ARTIST_PAGE_TYPES: &[&str] = &["MUSIC_PAGE_TYPE_ARTIST", "MUSIC_PAGE_TYPE_USER_CHANNEL"];
const ALBUM_PAGE_TYPE: &str = "MUSIC_PAGE_TYPE_ALBUM";
const AUDIO_PLAYLIST_PREFIX: &str = "OLAK5uy_";

/// Subtitle runs that are never an artist name
const TYPE_LABELS: &[&str] = &["Album", "Single", "EP", "Song", "Video", "Playlist", "Artist"];
const SEPARATORS: &[&str] = &["•", "&", ",", ""];

const SEARCH_SECTIONS: &str =
    "/contents/tabbedSearchResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents";

const ALBUM_HEADERS: &[&str] = &[
    "/contents/twoColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/musicResponsiveHeaderRenderer",
    "/header/musicDetailHeaderRenderer",
];

const ALBUM_TRACK_LISTS: &[&str] = &[
    "/contents/twoColumnBrowseResultsRenderer/secondaryContents/sectionListRenderer/contents/0/musicShelfRenderer/contents",
    "/contents/singleColumnBrowseResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents/0/musicShelfRenderer/contents",
];

const HEADER_THUMBNAILS: &[&str] = &[
    "/thumbnail/musicThumbnailRenderer/thumbnail/thumbnails",
    "/thumbnail/croppedSquareThumbnailRenderer/thumbnail/thumbnails",
];

/// A text run together with its (optional) navigation endpoint
struct Run<'a> {
    text: &'a str,
    node: &'a Value,
}

impl<'a> Run<'a> {
    fn page_type(&self) -> Option<&'a str> {
        self.node
            .pointer("/navigationEndpoint/browseEndpoint/browseEndpointContextSupportedConfigs/browseEndpointContextMusicConfig/pageType")
            .and_then(Value::as_str)
    }

    fn browse_id(&self) -> Option<&'a str> {
        self.node
            .pointer("/navigationEndpoint/browseEndpoint/browseId")
            .and_then(Value::as_str)
    }

    fn video_id(&self) -> Option<&'a str> {
        self.node
            .pointer("/navigationEndpoint/watchEndpoint/videoId")
            .and_then(Value::as_str)
    }

    fn is_artist(&self) -> bool {
        self.page_type()
            .is_some_and(|page| ARTIST_PAGE_TYPES.contains(&page))
    }
}

fn runs(node: Option<&Value>) -> Vec<Run<'_>> {
    node.and_then(|n| n.get("runs"))
        .and_then(Value::as_array)
        .map(|runs| {
            runs.iter()
                .filter_map(|node| {
                    let text = node.get("text")?.as_str()?;
                    Some(Run { text, node })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn flex_column(item: &Value, index: usize) -> Vec<Run<'_>> {
    runs(item.pointer(&format!(
        "/flexColumns/{}/musicResponsiveListItemFlexColumnRenderer/text",
        index
    )))
}

fn first_of<'a>(node: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers.iter().find_map(|p| node.pointer(p))
}

fn is_year(text: &str) -> bool {
    text.len() == 4 && text.chars().all(|c| c.is_ascii_digit())
}

fn is_duration(text: &str) -> bool {
    text.contains(':') && text.chars().all(|c| c.is_ascii_digit() || c == ':')
}

/// Artists linked from the runs, or the first plain name when nothing links
fn artists_from_runs(runs: &[Run<'_>]) -> Vec<String> {
    let linked: Vec<String> = runs
        .iter()
        .filter(|r| r.is_artist())
        .map(|r| r.text.to_string())
        .collect();

    if !linked.is_empty() {
        return linked;
    }

    runs.iter()
        .map(|r| r.text.trim())
        .find(|text| {
            !SEPARATORS.contains(text)
                && !TYPE_LABELS.contains(text)
                && !is_year(text)
                && !is_duration(text)
        })
        .map(|text| vec![text.to_string()])
        .unwrap_or_default()
}

fn year_from_runs(runs: &[Run<'_>]) -> Option<u32> {
    runs.iter()
        .map(|r| r.text.trim())
        .find(|text| is_year(text))
        .and_then(|text| text.parse().ok())
}

fn thumbnails(node: Option<&Value>) -> Vec<Thumbnail> {
    node.and_then(Value::as_array)
        .map(|thumbs| {
            thumbs
                .iter()
                .filter_map(|t| {
                    Some(Thumbnail {
                        url: t.get("url")?.as_str()?.to_string(),
                        width: t.get("width").and_then(Value::as_u64).map(|w| w as u32),
                        height: t.get("height").and_then(Value::as_u64).map(|h| h as u32),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract the ordered result list from a search response
pub fn parse_search_results(doc: &Value, kind: SearchKind) -> Vec<SearchResult> {
    let Some(sections) = doc.pointer(SEARCH_SECTIONS).and_then(Value::as_array) else {
        return Vec::new();
    };

    sections
        .iter()
        .filter_map(|section| {
            section
                .pointer("/musicShelfRenderer/contents")
                .and_then(Value::as_array)
        })
        .flatten()
        .filter_map(|entry| entry.get("musicResponsiveListItemRenderer"))
        .filter_map(|item| parse_search_item(item, kind))
        .collect()
}

fn parse_search_item(item: &Value, kind: SearchKind) -> Option<SearchResult> {
    let title_runs = flex_column(item, 0);
    let title_run = title_runs.first()?;
    let subtitle = flex_column(item, 1);

    let id = match kind {
        SearchKind::Album => item
            .pointer("/navigationEndpoint/browseEndpoint/browseId")
            .and_then(Value::as_str)
            .or_else(|| title_run.browse_id())?,
        SearchKind::Song => item
            .pointer("/playlistItemData/videoId")
            .and_then(Value::as_str)
            .or_else(|| title_run.video_id())?,
    };

    let album = match kind {
        SearchKind::Song => subtitle
            .iter()
            .find(|r| r.page_type() == Some(ALBUM_PAGE_TYPE))
            .map(|r| r.text.to_string()),
        SearchKind::Album => None,
    };

    Some(SearchResult {
        kind,
        title: title_run.text.to_string(),
        artists: artists_from_runs(&subtitle),
        id: id.to_string(),
        album,
        year: year_from_runs(&subtitle),
        thumbnails: thumbnails(item.pointer("/thumbnail/musicThumbnailRenderer/thumbnail/thumbnails")),
    })
}

/// Extract album details and its track list from a browse response
pub fn parse_album(doc: &Value, browse_id: &str) -> Result<AlbumDetails, ApiError> {
    let header = first_of(doc, ALBUM_HEADERS);

    let title = runs(header.and_then(|h| h.get("title")))
        .first()
        .map(|r| r.text.to_string());

    let subtitle = runs(header.and_then(|h| h.get("subtitle")));
    let strapline = runs(header.and_then(|h| h.get("straplineTextOne")));

    let mut artists = artists_from_runs(&strapline);
    if artists.is_empty() {
        artists = artists_from_runs(&subtitle);
    }

    let tracks: Vec<AlbumTrack> = first_of(doc, ALBUM_TRACK_LISTS)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(pos, entry)| {
                    parse_album_track(entry.get("musicResponsiveListItemRenderer")?, pos)
                })
                .collect()
        })
        .unwrap_or_default();

    let audio_playlist_id = find_audio_playlist_id(doc);

    if tracks.is_empty() && audio_playlist_id.is_none() {
        return Err(ApiError::AlbumNotFound(browse_id.to_string()));
    }

    Ok(AlbumDetails {
        browse_id: browse_id.to_string(),
        title,
        artists,
        year: year_from_runs(&subtitle),
        audio_playlist_id,
        thumbnails: thumbnails(header.and_then(|h| first_of(h, HEADER_THUMBNAILS))),
        tracks,
    })
}

fn parse_album_track(item: &Value, pos: usize) -> Option<AlbumTrack> {
    let title_runs = flex_column(item, 0);
    let title_run = title_runs.first()?;

    // Greyed out tracks carry no video id
    let video_id = item
        .pointer("/playlistItemData/videoId")
        .and_then(Value::as_str)
        .or_else(|| title_run.video_id())?;

    let number = item
        .pointer("/index/runs/0/text")
        .and_then(Value::as_str)
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(pos as u32 + 1);

    Some(AlbumTrack {
        video_id: video_id.to_string(),
        title: title_run.text.to_string(),
        number,
    })
}

/// Depth-first search for the album's audio playlist id
fn find_audio_playlist_id(node: &Value) -> Option<String> {
    match node {
        Value::Object(map) => {
            if let Some(id) = map.get("audioPlaylistId").and_then(Value::as_str) {
                return Some(id.to_string());
            }
            if let Some(id) = map
                .get("playlistId")
                .and_then(Value::as_str)
                .filter(|id| id.starts_with(AUDIO_PLAYLIST_PREFIX))
            {
                return Some(id.to_string());
            }
            map.values().find_map(find_audio_playlist_id)
        }
        Value::Array(items) => items.iter().find_map(find_audio_playlist_id),
        _ => None,
    }
}
