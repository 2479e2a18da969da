use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{self as io, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout, Command};
use tracing::Level;

use crate::config::DownloaderConfig;
use crate::download::{DownloadJob, Downloader};
use crate::error::DownloadError;

/// Print the info document as JSON once the file has reached its final path
const PRINT_AFTER_MOVE: &str = "after_move:%()j";

/// A finished download
#[derive(Debug, Clone, Serialize)]
pub struct DownloadedTrack {
    pub job: DownloadJob,
    pub path: PathBuf,
    /// Info document reported by the downloader
    pub info: Value,
}

/// yt-dlp wrapper
pub struct YtDlp {
    config: DownloaderConfig,
    verbose: bool,
}

impl YtDlp {
    pub fn new(config: DownloaderConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    pub fn command(&self) -> &str {
        &self.config.command
    }

    /// Check if the configured downloader is available in PATH
    pub fn is_available(&self) -> bool {
        which::which(&self.config.command).is_ok()
    }

    /// Arguments for a single job
    pub fn build_args(&self, job: &DownloadJob) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.config.format.clone(),
            "--no-progress".to_string(),
            "-P".to_string(),
            job.destination.display().to_string(),
            "-o".to_string(),
            job.output_template(),
            "-O".to_string(),
            PRINT_AFTER_MOVE.to_string(),
        ];

        if self.verbose {
            args.push("--verbose".to_string());
        }

        args.extend(self.config.extra_args.iter().cloned());
        args.push(job.url());

        args
    }

    /// Download a job, blocking until the downloader exits
    pub async fn run(&self, job: &DownloadJob) -> Result<DownloadedTrack, DownloadError> {
        if !self.is_available() {
            return Err(DownloadError::NotFound(self.config.command.clone()));
        }

        tokio::fs::create_dir_all(&job.destination)
            .await
            .map_err(|source| DownloadError::CreateDir {
                path: job.destination.clone(),
                source,
            })?;

        let args = self.build_args(job);
        tracing::debug!("Launching downloader: {} {}", self.config.command, args.join(" "));

        let mut child = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DownloadError::LaunchFailed(e.to_string()))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained together so neither can fill up and stall the child
        let (stdout, last_error) = tokio::try_join!(read_stdout(stdout), forward_stderr(stderr))
            .map_err(|e| DownloadError::LaunchFailed(e.to_string()))?;

        let status = child
            .wait()
            .await
            .map_err(|e| DownloadError::LaunchFailed(e.to_string()))?;

        if !status.success() {
            let reason = last_error
                .or_else(|| status.code().map(|code| format!("Exit code: {}", code)))
                .unwrap_or_else(|| "terminated by signal".to_string());
            return Err(DownloadError::ExitError(reason));
        }

        let (path, info) = parse_print_output(&stdout)?;

        Ok(DownloadedTrack {
            job: job.clone(),
            path,
            info,
        })
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn download(&self, job: &DownloadJob) -> Result<DownloadedTrack, DownloadError> {
        self.run(job).await
    }
}

/// Map a downloader stderr line to a log level, stripping the debug prefix
pub fn classify_line(line: &str) -> (Level, &str) {
    if let Some(rest) = line.strip_prefix("[debug] ") {
        (Level::DEBUG, rest)
    } else if let Some(rest) = line.strip_prefix("ERROR: ") {
        (Level::ERROR, rest)
    } else if let Some(rest) = line.strip_prefix("WARNING: ") {
        (Level::WARN, rest)
    } else {
        (Level::INFO, line)
    }
}

fn forward_log_line(line: &str) {
    if line.trim().is_empty() {
        return;
    }

    let (level, msg) = classify_line(line);
    if level == Level::DEBUG {
        tracing::debug!("yt-dlp: {}", msg);
    } else if level == Level::ERROR {
        tracing::error!("yt-dlp: {}", msg);
    } else if level == Level::WARN {
        tracing::warn!("yt-dlp: {}", msg);
    } else {
        tracing::info!("yt-dlp: {}", msg);
    }
}

async fn read_stdout(stdout: Option<ChildStdout>) -> io::Result<String> {
    let mut buf = Vec::new();
    if let Some(mut stdout) = stdout {
        stdout.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Log stderr lines as they arrive, returning the last error reported
async fn forward_stderr(stderr: Option<ChildStderr>) -> io::Result<Option<String>> {
    let Some(stderr) = stderr else {
        return Ok(None);
    };

    let mut last_error = None;
    let mut segments = BufReader::new(stderr).split(b'\n');

    while let Some(raw) = segments.next_segment().await? {
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches('\r');
        forward_log_line(line);

        if let Some(reason) = line.strip_prefix("ERROR: ") {
            last_error = Some(reason.to_string());
        }
    }

    Ok(last_error)
}

/// Find the final file path and info document in the downloader's stdout
pub fn parse_print_output(stdout: &str) -> Result<(PathBuf, Value), DownloadError> {
    let info: Value = stdout
        .lines()
        .rev()
        .filter(|line| line.trim_start().starts_with('{'))
        .find_map(|line| serde_json::from_str(line).ok())
        .ok_or(DownloadError::MissingOutput)?;

    let path = ["/filepath", "/requested_downloads/0/filepath", "/_filename"]
        .iter()
        .find_map(|pointer| info.pointer(pointer).and_then(Value::as_str))
        .map(PathBuf::from)
        .ok_or(DownloadError::MissingOutput)?;

    Ok((path, info))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> DownloadJob {
        DownloadJob {
            video_id: "Zi_XLOBDo_Y".to_string(),
            title: "Billie Jean".to_string(),
            artist: "Michael Jackson".to_string(),
            album: "Thriller".to_string(),
            track_number: Some(6),
            track_total: Some(9),
            year: Some(1982),
            destination: PathBuf::from("/music/Michael Jackson/Thriller"),
            cover_url: None,
        }
    }

    #[test]
    fn test_build_args() {
        let downloader = YtDlp::new(DownloaderConfig::default(), false);
        let args = downloader.build_args(&job());

        assert_eq!(args[0], "-f");
        assert_eq!(args[1], "m4a/bestaudio");
        assert!(args.contains(&"--no-progress".to_string()));
        assert!(!args.contains(&"--verbose".to_string()));

        let p = args.iter().position(|a| a == "-P").unwrap();
        assert_eq!(args[p + 1], "/music/Michael Jackson/Thriller");

        let o = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[o + 1], "Michael Jackson - %(title)s.%(ext)s");

        let print = args.iter().position(|a| a == "-O").unwrap();
        assert_eq!(args[print + 1], "after_move:%()j");

        assert_eq!(
            args.last().unwrap(),
            "https://music.youtube.com/watch?v=Zi_XLOBDo_Y"
        );
    }

    #[test]
    fn test_build_args_verbose_and_extra() {
        let config = DownloaderConfig {
            extra_args: vec!["--cookies".to_string(), "cookies.txt".to_string()],
            ..DownloaderConfig::default()
        };
        let downloader = YtDlp::new(config, true);
        let args = downloader.build_args(&job());

        assert!(args.contains(&"--verbose".to_string()));
        let n = args.len();
        assert_eq!(args[n - 3], "--cookies");
        assert_eq!(args[n - 2], "cookies.txt");
        assert!(args[n - 1].starts_with("https://"));
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(
            classify_line("[debug] Python 3.12"),
            (Level::DEBUG, "Python 3.12")
        );
        assert_eq!(
            classify_line("ERROR: Video unavailable"),
            (Level::ERROR, "Video unavailable")
        );
        assert_eq!(
            classify_line("WARNING: nsig extraction failed"),
            (Level::WARN, "nsig extraction failed")
        );
        assert_eq!(
            classify_line("[youtube] Extracting URL"),
            (Level::INFO, "[youtube] Extracting URL")
        );
    }

    #[test]
    fn test_parse_print_output() {
        let stdout = "{\"title\": \"Billie Jean\", \"filepath\": \"/music/Michael Jackson/Thriller/Michael Jackson - Billie Jean.m4a\", \"genre\": \"Pop\"}\n";
        let (path, info) = parse_print_output(stdout).unwrap();

        assert_eq!(
            path,
            PathBuf::from("/music/Michael Jackson/Thriller/Michael Jackson - Billie Jean.m4a")
        );
        assert_eq!(info["genre"], "Pop");
    }

    #[test]
    fn test_parse_print_output_requested_downloads() {
        let stdout = "noise\n{\"requested_downloads\": [{\"filepath\": \"/tmp/a.m4a\"}]}\n";
        let (path, _) = parse_print_output(stdout).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a.m4a"));
    }

    #[test]
    fn test_parse_print_output_missing() {
        assert!(matches!(
            parse_print_output(""),
            Err(DownloadError::MissingOutput)
        ));
        assert!(matches!(
            parse_print_output("{\"title\": \"no path\"}"),
            Err(DownloadError::MissingOutput)
        ));
    }

    #[tokio::test]
    async fn test_missing_command_is_reported() {
        let config = DownloaderConfig {
            command: "muclic-test-no-such-downloader".to_string(),
            ..DownloaderConfig::default()
        };
        let downloader = YtDlp::new(config, false);

        assert!(!downloader.is_available());
        let result = downloader.run(&job()).await;
        assert!(matches!(result, Err(DownloadError::NotFound(cmd)) if cmd == "muclic-test-no-such-downloader"));
    }

    #[cfg(unix)]
    fn fake_downloader(dir: &std::path::Path, body: &str) -> YtDlp {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-yt-dlp");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = DownloaderConfig {
            command: path.display().to_string(),
            ..DownloaderConfig::default()
        };
        YtDlp::new(config, false)
    }

    #[cfg(unix)]
    fn job_in(dir: &std::path::Path) -> DownloadJob {
        DownloadJob {
            destination: dir.join("Michael Jackson").join("Thriller"),
            ..job()
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_final_path_and_info() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = fake_downloader(
            dir.path(),
            r#"echo "[debug] Invoked with $#" >&2
echo "WARNING: slow connection" >&2
echo '{"title": "Billie Jean", "filepath": "/music/Michael Jackson - Billie Jean.m4a", "genre": "Pop"}'"#,
        );
        let job = job_in(dir.path());

        let track = downloader.run(&job).await.unwrap();

        assert_eq!(track.path, PathBuf::from("/music/Michael Jackson - Billie Jean.m4a"));
        assert_eq!(track.info["genre"], "Pop");
        assert_eq!(track.job, job);
        assert!(job.destination.is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_exit_error_uses_last_error_line() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = fake_downloader(
            dir.path(),
            r#"echo "ERROR: first" >&2
echo "ERROR: [youtube] Zi_XLOBDo_Y: Video unavailable" >&2
exit 1"#,
        );

        let result = downloader.run(&job_in(dir.path())).await;
        assert!(matches!(
            result,
            Err(DownloadError::ExitError(reason)) if reason == "[youtube] Zi_XLOBDo_Y: Video unavailable"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_exit_error_without_message() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = fake_downloader(dir.path(), "exit 2");

        let result = downloader.run(&job_in(dir.path())).await;
        assert!(matches!(result, Err(DownloadError::ExitError(reason)) if reason == "Exit code: 2"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_without_printed_path() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = fake_downloader(dir.path(), "echo 'done'");

        let result = downloader.run(&job_in(dir.path())).await;
        assert!(matches!(result, Err(DownloadError::MissingOutput)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_destination_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = fake_downloader(dir.path(), "exit 0");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let job = DownloadJob {
            destination: blocker.join("Thriller"),
            ..job()
        };

        let result = downloader.run(&job).await;
        assert!(matches!(result, Err(DownloadError::CreateDir { path, .. }) if path == blocker.join("Thriller")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_unlaunchable_command() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-program");
        std::fs::write(&path, "no interpreter line here").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = DownloaderConfig {
            command: path.display().to_string(),
            ..DownloaderConfig::default()
        };
        let downloader = YtDlp::new(config, false);

        let result = downloader.run(&job_in(dir.path())).await;
        assert!(matches!(result, Err(DownloadError::LaunchFailed(_))));
    }
}
