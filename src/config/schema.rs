use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub downloader: DownloaderConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,
}

impl Config {
    /// Resolve the output directory: CLI flag, then config file, then the
    /// platform music directory
    pub fn output_dir(&self, cli_dir: Option<&str>) -> PathBuf {
        cli_dir
            .or(self.output.dir.as_deref())
            .map(expand_tilde)
            .unwrap_or_else(default_music_dir)
    }
}

/// Output location configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory downloads are written under (`<dir>/<artist>/<album>`)
    #[serde(default)]
    pub dir: Option<String>,
}

/// Downloader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Command used to download audio
    #[serde(default = "default_downloader_command")]
    pub command: String,

    /// Format selector passed with `-f`
    #[serde(default = "default_format")]
    pub format: String,

    /// Additional arguments passed to the downloader before the URL
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            command: default_downloader_command(),
            format: default_format(),
            extra_args: Vec::new(),
        }
    }
}

fn default_downloader_command() -> String {
    "yt-dlp".to_string()
}

fn default_format() -> String {
    "m4a/bestaudio".to_string()
}

/// Tagging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Embed album art as the front cover
    #[serde(default = "default_true")]
    pub embed_cover: bool,

    /// Smallest thumbnail width preferred for the cover
    #[serde(default = "default_cover_min_width")]
    pub cover_min_width: u32,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            embed_cover: true,
            cover_min_width: default_cover_min_width(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cover_min_width() -> u32 {
    500
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }

    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn default_music_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .unwrap_or_else(|| PathBuf::from("."))
}
