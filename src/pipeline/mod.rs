//! Download pipeline.
//!
//! Turns the picked search results into download jobs, runs them one at a
//! time, then tags and dumps whatever succeeded. A failing album, download or
//! tag write is reported and the remaining items carry on.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::api::{Catalog, SearchKind, SearchResult};
use crate::download::{album_jobs, song_job, DownloadJob, DownloadedTrack, Downloader};
use crate::dump::write_dump;
use crate::tagging::{pick_cover, Tagger, TrackTags};

/// Settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Root directory downloads are written under
    pub output_dir: PathBuf,
    pub tag: bool,
    pub embed_cover: bool,
    pub cover_min_width: u32,
    pub dump_json: bool,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub planned: usize,
    pub downloaded: usize,
    pub tagged: usize,
    /// Albums that could not be resolved, downloads and tag writes that failed
    pub failed: usize,
    pub dump_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

pub struct Pipeline<'a> {
    catalog: &'a dyn Catalog,
    downloader: &'a dyn Downloader,
    tagger: Option<&'a dyn Tagger>,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        downloader: &'a dyn Downloader,
        tagger: Option<&'a dyn Tagger>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            catalog,
            downloader,
            tagger,
            options,
        }
    }

    fn wants_covers(&self) -> bool {
        self.options.tag && self.options.embed_cover && self.tagger.is_some()
    }

    /// Plan, download, tag and dump the picked results
    pub async fn run(
        &self,
        query: &str,
        results: &[SearchResult],
        picks: &[usize],
    ) -> RunSummary {
        let (jobs, plan_failed) = self.plan(results, picks).await;
        let (tracks, download_failed) = self.download(&jobs).await;
        let (tagged, tag_failed) = self.tag(&tracks).await;

        let mut failed = plan_failed + download_failed + tag_failed;
        let mut dump_path = None;

        if self.options.dump_json {
            match write_dump(&self.options.output_dir, query, &tracks) {
                Ok(path) => dump_path = Some(path),
                Err(e) => {
                    tracing::error!("Could not write metadata dump: {:#}", e);
                    failed += 1;
                }
            }
        }

        RunSummary {
            planned: jobs.len(),
            downloaded: tracks.len(),
            tagged,
            failed,
            dump_path,
        }
    }

    /// One job per picked song, one job per track of each picked album.
    ///
    /// Returns the jobs and the number of picks that could not be planned.
    pub async fn plan(&self, results: &[SearchResult], picks: &[usize]) -> (Vec<DownloadJob>, usize) {
        let mut jobs = Vec::new();
        let mut failed = 0;

        for result in picks.iter().filter_map(|&pick| results.get(pick)) {
            match result.kind {
                SearchKind::Song => {
                    let cover_url = if self.wants_covers() {
                        self.song_cover(result).await
                    } else {
                        None
                    };
                    jobs.push(song_job(result, &self.options.output_dir, cover_url));
                }
                SearchKind::Album => match self.catalog.album(&result.id).await {
                    Ok(mut album) => {
                        album.fill_gaps(result);

                        let thumbnails = if album.thumbnails.is_empty() {
                            &result.thumbnails
                        } else {
                            &album.thumbnails
                        };
                        let cover_url = pick_cover(thumbnails, self.options.cover_min_width)
                            .map(|t| t.url.clone());

                        let planned = album_jobs(&album, &self.options.output_dir, cover_url);
                        tracing::info!(
                            "{} - {}: {} tracks",
                            album.primary_artist(),
                            album.title(),
                            planned.len()
                        );
                        let playlist_url = album.playlist_url();
                        if let Some(url) = &playlist_url {
                            tracing::debug!("Album playlist: {}", url);
                        }

                        if planned.is_empty() {
                            match playlist_url {
                                Some(url) => tracing::error!(
                                    "No downloadable tracks on {}, try the album playlist: {}",
                                    result.display_line(),
                                    url
                                ),
                                None => tracing::error!("No downloadable tracks on {}", result.display_line()),
                            }
                            failed += 1;
                        }
                        jobs.extend(planned);
                    }
                    Err(e) => {
                        tracing::error!("Skipping {}: {}", result.display_line(), e);
                        failed += 1;
                    }
                },
            }
        }

        (jobs, failed)
    }

    /// Cover for a single song: the artwork of its album
    async fn song_cover(&self, result: &SearchResult) -> Option<String> {
        let min_width = self.options.cover_min_width;
        let album = result.album.as_deref().unwrap_or(&result.title);

        tracing::debug!("Searching for matching album...");

        match self.catalog.album_thumbnails(album, result.primary_artist()).await {
            Ok(thumbnails) => pick_cover(&thumbnails, min_width)
                .or_else(|| pick_cover(&result.thumbnails, min_width))
                .map(|t| t.url.clone()),
            Err(e) => {
                tracing::warn!("Album art lookup failed for {}: {}", result.title, e);
                pick_cover(&result.thumbnails, min_width).map(|t| t.url.clone())
            }
        }
    }

    /// Run the jobs in order; failures are logged and counted
    pub async fn download(&self, jobs: &[DownloadJob]) -> (Vec<DownloadedTrack>, usize) {
        let mut tracks = Vec::with_capacity(jobs.len());
        let mut failed = 0;

        for (index, job) in jobs.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Downloading {} - {}",
                index + 1,
                jobs.len(),
                job.artist,
                job.title
            );

            match self.downloader.download(job).await {
                Ok(track) => {
                    tracing::info!("Saved {}", track.path.display());
                    tracks.push(track);
                }
                Err(e) => {
                    tracing::error!("Failed to download {} - {}: {}", job.artist, job.title, e);
                    failed += 1;
                }
            }
        }

        (tracks, failed)
    }

    /// Tag downloaded files.
    ///
    /// Returns the number of files tagged and the number of failed writes.
    pub async fn tag(&self, tracks: &[DownloadedTrack]) -> (usize, usize) {
        if !self.options.tag || tracks.is_empty() {
            return (0, 0);
        }

        let Some(tagger) = self.tagger else {
            tracing::warn!("Tagging support is not included in this build");
            tracing::warn!("Rebuild with the 'tag' feature to tag downloads");
            tracing::warn!("Skipping tagging");
            return (0, 0);
        };

        // Albums share one cover, fetch each URL once
        let mut covers: HashMap<String, Option<Vec<u8>>> = HashMap::new();
        let mut tagged = 0;
        let mut failed = 0;

        for track in tracks {
            let cover = match track.job.cover_url.as_ref() {
                Some(url) if self.options.embed_cover => {
                    if !covers.contains_key(url) {
                        let bytes = match self.catalog.fetch_image(url).await {
                            Ok(bytes) => Some(bytes),
                            Err(e) => {
                                tracing::warn!("Could not fetch cover art: {}", e);
                                None
                            }
                        };
                        covers.insert(url.clone(), bytes);
                    }
                    covers.get(url).and_then(|bytes| bytes.as_deref())
                }
                _ => None,
            };

            let tags = TrackTags::from_download(track);
            match tagger.tag(&track.path, &tags, cover) {
                Ok(()) => tagged += 1,
                Err(e) => {
                    tracing::error!("{}", e);
                    failed += 1;
                }
            }
        }

        (tagged, failed)
    }
}
