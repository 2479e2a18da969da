//! Diagnostic JSON dump of everything downloaded in a run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use crate::download::DownloadedTrack;
use crate::error::Result;

pub const DUMP_FILE_NAME: &str = "info.json";

#[derive(Serialize)]
struct DumpDocument<'a> {
    generated_at: String,
    query: &'a str,
    items: &'a [DownloadedTrack],
}

/// Write `info.json` into `output_dir` and return its path
pub fn write_dump(output_dir: &Path, query: &str, items: &[DownloadedTrack]) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let path = output_dir.join(DUMP_FILE_NAME);
    let document = DumpDocument {
        generated_at: Utc::now().to_rfc3339(),
        query,
        items,
    };

    let content = serde_json::to_string_pretty(&document)?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Wrote metadata dump to {}", path.display());

    Ok(path)
}
