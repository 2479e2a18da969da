use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::api::media::{AlbumDetails, SearchKind, SearchResult, Thumbnail};
use crate::api::parse::{parse_album, parse_search_results};
use crate::api::Catalog;
use crate::error::ApiError;

const YTM_ORIGIN: &str = "https://music.youtube.com";
const YTM_API_URL: &str = "https://music.youtube.com/youtubei/v1";
const CLIENT_NAME: &str = "WEB_REMIX";
const CLIENT_VERSION: &str = "1.20241023.01.00";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0";

/// YouTube Music web client
pub struct YtMusicClient {
    client: Client,
}

impl YtMusicClient {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Client context sent with every request
    fn context() -> Value {
        serde_json::json!({
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION,
                "hl": "en",
                "gl": "US"
            },
            "user": {}
        })
    }

    /// POST a request body to an endpoint and return the response document
    async fn post(&self, endpoint: &str, mut body: Value) -> Result<Value, ApiError> {
        let url = format!("{}/{}?prettyPrint=false", YTM_API_URL, endpoint);
        body["context"] = Self::context();

        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Origin", YTM_ORIGIN)
            .header("Referer", format!("{}/", YTM_ORIGIN))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::YtMusic(format!("HTTP {}", response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::YtMusic(format!("Failed to parse response: {}", e)))
    }

    /// Search albums or songs
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
    ) -> Result<Vec<SearchResult>, ApiError> {
        let body = serde_json::json!({
            "query": query,
            "params": kind.filter_params()
        });

        let doc = self.post("search", body).await?;
        let results = parse_search_results(&doc, kind);

        tracing::debug!("Search for {:?} returned {} {}s", query, results.len(), kind.label());

        Ok(results)
    }

    /// Get album details and its track list by browse id
    pub async fn get_album(&self, browse_id: &str) -> Result<AlbumDetails, ApiError> {
        let body = serde_json::json!({ "browseId": browse_id });

        let doc = self.post("browse", body).await?;
        parse_album(&doc, browse_id)
    }

    /// Find the artwork of an album by searching for it
    pub async fn find_album_thumbnails(
        &self,
        album: &str,
        artist: &str,
    ) -> Result<Vec<Thumbnail>, ApiError> {
        let query = format!("{} {}", album, artist);
        let results = self.search(&query, SearchKind::Album).await?;

        Ok(results
            .into_iter()
            .next()
            .map(|r| r.thumbnails)
            .unwrap_or_default())
    }

    /// Download an image
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::YtMusic(format!(
                "HTTP {} fetching {}",
                response.status(),
                url
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Catalog for YtMusicClient {
    async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<SearchResult>, ApiError> {
        YtMusicClient::search(self, query, kind).await
    }

    async fn album(&self, browse_id: &str) -> Result<AlbumDetails, ApiError> {
        self.get_album(browse_id).await
    }

    async fn album_thumbnails(
        &self,
        album: &str,
        artist: &str,
    ) -> Result<Vec<Thumbnail>, ApiError> {
        self.find_album_thumbnails(album, artist).await
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        YtMusicClient::fetch_image(self, url).await
    }
}
