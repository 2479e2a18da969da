use clap::Parser;

use crate::api::SearchKind;

/// muclic - A CLI for downloading music from YouTube Music
#[derive(Parser, Debug)]
#[command(name = "muclic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Search query, prompted for when omitted
    pub query: Vec<String>,

    /// Directory to download into (default: config value, then the system music folder)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Search for songs instead of albums
    #[arg(short, long)]
    pub song: bool,

    /// Do not write metadata tags
    #[arg(short = 'T', long)]
    pub no_tag: bool,

    /// Write a JSON dump of everything downloaded to info.json
    #[arg(long)]
    pub dump_json: bool,

    /// Verbose logging, including downloader output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Positional words joined into one query
    pub fn query_text(&self) -> Option<String> {
        let query = self.query.join(" ");
        let query = query.trim();
        if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        }
    }

    pub fn kind(&self) -> SearchKind {
        if self.song {
            SearchKind::Song
        } else {
            SearchKind::Album
        }
    }
}
