mod job;
mod ytdlp;

use async_trait::async_trait;

pub use job::{album_jobs, song_job, DownloadJob};
pub use ytdlp::{DownloadedTrack, YtDlp};

use crate::error::DownloadError;

/// Media download tool used by the pipeline.
///
/// `YtDlp` is the production implementation; tests substitute fakes.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download one job, returning the file it produced
    async fn download(&self, job: &DownloadJob) -> Result<DownloadedTrack, DownloadError>;
}
