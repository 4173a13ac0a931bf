#[cfg(feature = "server")]
use super::tracker::ProgressEvent;

/// Marker yt-dlp prints in front of every templated progress line
pub const PROGRESS_MARKER: &str = "[dl-progress]";

/// Shorten a URL for the download list
pub fn truncate_url(url: &str, max_chars: usize) -> String {
    if url.chars().count() <= max_chars {
        return url.to_string();
    }
    let head: String = url.chars().take(max_chars).collect();
    format!("{}...", head)
}

/// Trimmed http(s) URL, or a message saying what is wrong with it
pub fn validate_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Please enter a video URL".to_string());
    }
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        Ok(parsed) => Err(format!("Unsupported URL scheme: {}", parsed.scheme())),
        Err(e) => Err(format!("Invalid URL: {}", e)),
    }
}

/// Parse one line of yt-dlp output into a progress event
#[cfg(feature = "server")]
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let payload = line.trim().strip_prefix(PROGRESS_MARKER)?;
    match serde_json::from_str::<ProgressEvent>(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!("Ignoring malformed progress payload: {}", e);
            None
        }
    }
}

/// Turn yt-dlp's stderr into a single fault description
#[cfg(feature = "server")]
pub fn summarize_stderr(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:"))
        .map(|message| message.trim().to_string())
        .or_else(|| {
            lines
                .iter()
                .rev()
                .map(|line| line.trim())
                .find(|line| !line.is_empty())
                .map(str::to_string)
        })
}

/// Format a duration in seconds as `H:MM:SS` or `M:SS`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// yt-dlp reports upload dates as `YYYYMMDD`
pub fn format_upload_date(raw: &str) -> String {
    chrono::NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Thousands separators for view counts
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;
    use crate::server::download::tracker::EventStatus;

    #[test]
    fn parses_templated_progress_line() {
        let line = r#"[dl-progress]{"status": "downloading", "downloaded_bytes": 1024, "total_bytes": null, "total_bytes_estimate": 4096.5, "filename": "downloads/clip.mp4", "eta": 3}"#;
        let event = parse_progress_line(line).unwrap();
        assert_eq!(event.status, EventStatus::Downloading);
        assert_eq!(event.downloaded_bytes, Some(1024.0));
        assert_eq!(event.total_bytes, None);
        assert_eq!(event.total_bytes_estimate, Some(4096.5));
        assert_eq!(event.filename.as_deref(), Some("downloads/clip.mp4"));
    }

    #[test]
    fn ignores_regular_output_and_garbage() {
        assert!(parse_progress_line("[youtube] abc: Downloading webpage").is_none());
        assert!(parse_progress_line("[dl-progress]not json").is_none());
        assert!(parse_progress_line("").is_none());
    }

    #[test]
    fn stderr_summary_prefers_error_lines() {
        let lines = vec![
            "WARNING: something odd".to_string(),
            "ERROR: [generic] Unable to download webpage: network error".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            summarize_stderr(&lines).as_deref(),
            Some("[generic] Unable to download webpage: network error")
        );

        let lines = vec!["Traceback ...".to_string(), "KeyError: 'x'".to_string()];
        assert_eq!(summarize_stderr(&lines).as_deref(), Some("KeyError: 'x'"));
        assert_eq!(summarize_stderr(&[]), None);
    }

    #[test]
    fn validates_urls() {
        assert_eq!(
            validate_url("  https://example.com/v1 ").as_deref(),
            Ok("https://example.com/v1")
        );
        assert!(validate_url("").is_err());
        assert!(validate_url("ftp://example.com/file").is_err());
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn truncates_long_urls_only() {
        assert_eq!(truncate_url("https://a.b/c", 50), "https://a.b/c");
        let long = format!("https://example.com/{}", "x".repeat(60));
        let short = truncate_url(&long, 50);
        assert_eq!(short.chars().count(), 53);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn formats_metadata_values() {
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(3725), "1:02:05");
        assert_eq!(format_upload_date("20240131"), "2024-01-31");
        assert_eq!(format_upload_date("sometime"), "sometime");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(999), "999");
    }
}
