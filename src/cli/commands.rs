use std::io::{self, BufRead, Write};

use crate::api::{Catalog, SearchKind, YtMusicClient};
use crate::cli::Cli;
use crate::config::load_config;
use crate::download::YtDlp;
use crate::error::{DownloadError, Result};
use crate::pipeline::{Pipeline, PipelineOptions, RunSummary};
use crate::tagging::default_tagger;
use crate::ui::{prompt_query, Menu};

/// Entry point: wire the real collaborators and run one session on stdin/stdout
pub async fn run(cli: Cli) -> Result<RunSummary> {
    let config = load_config()?;

    let downloader = YtDlp::new(config.downloader.clone(), cli.debug);
    if !downloader.is_available() {
        return Err(DownloadError::NotFound(downloader.command().to_string()).into());
    }

    let client = YtMusicClient::new()?;

    let tag = !cli.no_tag && config.tagging.enabled;
    let tagger = if tag { default_tagger() } else { None };

    let options = PipelineOptions {
        output_dir: config.output_dir(cli.dir.as_deref()),
        tag,
        embed_cover: config.tagging.embed_cover,
        cover_min_width: config.tagging.cover_min_width,
        dump_json: cli.dump_json,
    };
    tracing::debug!("Downloading into {}", options.output_dir.display());

    let pipeline = Pipeline::new(&client, &downloader, tagger.as_deref(), options);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    search_and_download(
        &client,
        &pipeline,
        cli.kind(),
        cli.query_text(),
        &mut input,
        &mut out,
    )
    .await
}

/// Search, pick from the menu, then download the picks.
///
/// Quitting at a prompt or an empty result list ends the run cleanly with an
/// empty summary.
pub async fn search_and_download<R: BufRead, W: Write>(
    catalog: &dyn Catalog,
    pipeline: &Pipeline<'_>,
    kind: SearchKind,
    query: Option<String>,
    input: &mut R,
    out: &mut W,
) -> Result<RunSummary> {
    let query = match query {
        Some(query) => query,
        None => match prompt_query(input, out)? {
            Some(query) => query,
            None => return Ok(RunSummary::default()),
        },
    };

    tracing::info!("Searching {}s for \"{}\"", kind.label(), query);
    let results = catalog.search(&query, kind).await?;

    if results.is_empty() {
        writeln!(out, "No results for \"{}\"", query)?;
        return Ok(RunSummary::default());
    }

    let menu = Menu::new(&results);
    menu.render(out)?;

    let picks = match menu.prompt(input, out)? {
        Some(picks) => picks,
        None => return Ok(RunSummary::default()),
    };

    let summary = pipeline.run(&query, &results, &picks).await;

    writeln!(
        out,
        "Downloaded {} of {} tracks ({} tagged)",
        summary.downloaded, summary.planned, summary.tagged
    )?;
    if let Some(path) = &summary.dump_path {
        writeln!(out, "Metadata written to {}", path.display())?;
    }

    Ok(summary)
}
