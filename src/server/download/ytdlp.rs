use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::OnceCell;
use youtube_dl::{YoutubeDl, YoutubeDlOutput};

use super::engine::{DownloadEngine, EngineJob, ProgressCallback};
use super::error::EngineError;
use super::types::VideoInfo;
use super::utils::{self, PROGRESS_MARKER};

const DESCRIPTION_PREVIEW_CHARS: usize = 200;

/// Download engine backed by the yt-dlp executable
pub struct YtDlpEngine {
    configured_path: Option<PathBuf>,
    socket_timeout_secs: u32,
    binary: OnceCell<PathBuf>,
}

impl YtDlpEngine {
    pub fn new(configured_path: Option<PathBuf>, socket_timeout_secs: u32) -> Self {
        Self {
            configured_path,
            socket_timeout_secs,
            binary: OnceCell::new(),
        }
    }

    /// Resolve the executable once per process
    async fn binary(&self) -> Result<&PathBuf, EngineError> {
        self.binary
            .get_or_try_init(|| ensure_yt_dlp_available(self.configured_path.clone()))
            .await
    }
}

#[async_trait]
impl DownloadEngine for YtDlpEngine {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, EngineError> {
        let binary = self.binary().await?;
        tracing::info!("Getting video info for: {}", url);

        let mut command = YoutubeDl::new(url);
        command
            .youtube_dl_path(binary)
            .socket_timeout(self.socket_timeout_secs.to_string());

        let video = match command
            .run_async()
            .await
            .map_err(|e| EngineError::Fault(e.to_string()))?
        {
            YoutubeDlOutput::SingleVideo(video) => video,
            YoutubeDlOutput::Playlist(_) => {
                return Err(EngineError::Fault(
                    "URL points to a playlist, not a single video".to_string(),
                ));
            }
        };

        let json = serde_json::to_value(&video)
            .map_err(|e| EngineError::Fault(format!("Error reading video info: {}", e)))?;
        Ok(video_info_from_json(&json))
    }

    async fn download(
        &self,
        job: &EngineJob,
        on_progress: ProgressCallback<'_>,
    ) -> Result<(), EngineError> {
        let binary = self.binary().await?;
        let args = download_args(job, self.socket_timeout_secs);
        tracing::info!("Running {} {}", binary.display(), args.join(" "));

        let mut child = Command::new(binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(EngineError::Launch)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Fault("yt-dlp stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Fault("yt-dlp stderr was not captured".to_string()))?;

        let stderr_task = tokio::spawn(async move {
            let mut collected = Vec::new();
            let mut reader = BufReader::new(stderr);
            let mut buf = Vec::new();
            loop {
                match read_lossy_line(&mut reader, &mut buf).await {
                    Ok(Some(line)) => {
                        tracing::debug!("yt-dlp stderr: {}", line);
                        collected.push(line);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Stopped reading yt-dlp stderr: {}", e);
                        break;
                    }
                }
            }
            collected
        });

        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        while let Some(line) = read_lossy_line(&mut reader, &mut buf).await? {
            match utils::parse_progress_line(&line) {
                Some(event) => on_progress(event),
                None => tracing::debug!("yt-dlp: {}", line),
            }
        }

        let status = child.wait().await?;
        let stderr_lines = stderr_task.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            let description = utils::summarize_stderr(&stderr_lines)
                .unwrap_or_else(|| format!("yt-dlp exited with {}", status));
            Err(EngineError::Fault(description))
        }
    }
}

/// Next line of child output, or `None` at end of stream.
///
/// Console encodings vary by platform, so undecodable bytes become
/// U+FFFD instead of failing the read.
async fn read_lossy_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(|c: char| c == '\n' || c == '\r').to_string()))
}

/// Command line for one download
pub fn download_args(job: &EngineJob, socket_timeout_secs: u32) -> Vec<String> {
    let mut args = vec![
        "--newline".to_string(),
        "--encoding".to_string(),
        "utf-8".to_string(),
        "--progress-template".to_string(),
        format!("download:{}%(progress)j", PROGRESS_MARKER),
        "--socket-timeout".to_string(),
        socket_timeout_secs.to_string(),
        "-f".to_string(),
        job.format.clone(),
        "-o".to_string(),
        job.output_template.clone(),
    ];

    if let Some(audio) = &job.audio {
        args.extend([
            "-x".to_string(),
            "--audio-format".to_string(),
            audio.codec.to_string(),
            "--audio-quality".to_string(),
            format!("{}K", audio.quality),
        ]);
    }

    args.push("--".to_string());
    args.push(job.url.clone());
    args
}

/// Pick the fields shown in the info card out of yt-dlp's JSON
pub fn video_info_from_json(json: &Value) -> VideoInfo {
    let text = |key: &str| {
        json.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let duration = text("duration_string").or_else(|| {
        json.get("duration")
            .and_then(Value::as_f64)
            .filter(|secs| *secs >= 0.0)
            .map(|secs| utils::format_duration(secs.round() as u64))
    });

    // the card always shows a preview, even for short descriptions
    let description = text("description").map(|full| {
        let preview: String = full.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{}...", preview)
    });

    VideoInfo {
        title: text("title"),
        uploader: text("uploader"),
        duration,
        view_count: json.get("view_count").and_then(Value::as_u64),
        upload_date: text("upload_date").map(|raw| utils::format_upload_date(&raw)),
        description,
        thumbnail: text("thumbnail"),
    }
}

/// Find a working yt-dlp: configured path, then `PATH`, then a cached or
/// freshly downloaded copy in the app data directory
pub async fn ensure_yt_dlp_available(configured: Option<PathBuf>) -> Result<PathBuf, EngineError> {
    if let Some(path) = configured {
        let version = probe_version(&path).await.map_err(|e| {
            EngineError::Unavailable(format!("configured yt-dlp at {} failed: {}", path.display(), e))
        })?;
        tracing::info!("Using configured yt-dlp {}: {}", path.display(), version);
        return Ok(path);
    }

    let system = PathBuf::from(get_yt_dlp_binary_name());
    if let Ok(version) = probe_version(&system).await {
        tracing::info!("Found yt-dlp on PATH: {}", version);
        return Ok(system);
    }

    let bin_dir = get_app_data_dir()?.join("bin");
    std::fs::create_dir_all(&bin_dir).map_err(|e| {
        EngineError::Unavailable(format!("Failed to create bin directory: {}", e))
    })?;

    let cached = bin_dir.join(get_yt_dlp_binary_name());
    if cached.exists() {
        match probe_version(&cached).await {
            Ok(version) => {
                tracing::info!("Found cached yt-dlp: {}", version);
                return Ok(cached);
            }
            Err(e) => {
                // the existing binary doesn't work, fetch a new one
                tracing::warn!("Cached yt-dlp is broken ({}), replacing it", e);
                let _ = std::fs::remove_file(&cached);
            }
        }
    }

    tracing::info!("yt-dlp not found, downloading it to {}", bin_dir.display());
    let downloaded = youtube_dl::download_yt_dlp(&bin_dir)
        .await
        .map_err(|e| EngineError::Unavailable(format!("Failed to download yt-dlp: {}", e)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&downloaded, std::fs::Permissions::from_mode(0o755))
        {
            tracing::error!("Failed to set executable permissions: {}", e);
        }
    }

    let version = probe_version(&downloaded).await.map_err(|e| {
        EngineError::Unavailable(format!("Downloaded yt-dlp failed verification: {}", e))
    })?;
    tracing::info!("Downloaded yt-dlp is working: {}", version);
    Ok(downloaded)
}

async fn probe_version(path: &Path) -> Result<String, EngineError> {
    let output = Command::new(path)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(EngineError::Launch)?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(EngineError::Fault(format!(
            "`--version` exited with {}",
            output.status
        )))
    }
}

/// Platform data directory used to cache the yt-dlp binary
fn get_app_data_dir() -> Result<PathBuf, EngineError> {
    let base_dir = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .ok_or_else(|| {
            EngineError::Unavailable("Could not determine app data directory".to_string())
        })?;

    Ok(base_dir.join("video_downloader_web"))
}

fn get_yt_dlp_binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}
