use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;

use super::types::{DownloadRequest, JobState, ProgressRecord};

pub const STATUS_PREPARING: &str = "Preparing...";
pub const STATUS_QUEUED: &str = "Queued...";
pub const STATUS_COMPLETE: &str = "Download complete!";

/// Status tag carried by an engine progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Downloading,
    Finished,
    #[serde(other)]
    Other,
}

/// One progress callback from the engine.
///
/// Field names follow yt-dlp's progress dictionary. Byte counts arrive as
/// floats for estimates, so every number is read as `f64`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressEvent {
    pub status: EventStatus,
    #[serde(default)]
    pub downloaded_bytes: Option<f64>,
    #[serde(default)]
    pub total_bytes: Option<f64>,
    #[serde(default)]
    pub total_bytes_estimate: Option<f64>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl ProgressEvent {
    pub fn downloading(done: f64, total: Option<f64>, estimate: Option<f64>) -> Self {
        Self {
            status: EventStatus::Downloading,
            downloaded_bytes: Some(done),
            total_bytes: total,
            total_bytes_estimate: estimate,
            filename: None,
        }
    }

    pub fn finished(filename: Option<&str>) -> Self {
        Self {
            status: EventStatus::Finished,
            downloaded_bytes: None,
            total_bytes: None,
            total_bytes_estimate: None,
            filename: filename.map(str::to_string),
        }
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    /// Exact total if known, the estimate otherwise
    fn effective_total(&self) -> Option<f64> {
        self.total_bytes
            .filter(|total| *total > 0.0)
            .or(self.total_bytes_estimate)
    }
}

/// `floor(done / total * 100)`, clamped to 0..=100.
///
/// Returns `None` when the total is missing, zero or not a number.
pub fn compute_percent(done: f64, total: f64) -> Option<u8> {
    if !done.is_finite() || !total.is_finite() || total <= 0.0 {
        return None;
    }
    let percent = (done / total * 100.0).floor().clamp(0.0, 100.0);
    Some(percent as u8)
}

/// Shared handle on one download's progress record.
///
/// The engine callback writes through it from the download task while
/// server functions read snapshots for rendering.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    record: Arc<RwLock<ProgressRecord>>,
}

impl ProgressTracker {
    pub fn new(request: &DownloadRequest) -> Self {
        Self {
            record: Arc::new(RwLock::new(ProgressRecord {
                request: request.clone(),
                percent: 0,
                status: STATUS_PREPARING.to_string(),
                filename: None,
                error: None,
                state: JobState::Queued,
            })),
        }
    }

    /// Callback entry point for engine progress events
    pub fn on_event(&self, event: &ProgressEvent) {
        let mut record = self.record.write();
        match event.status {
            EventStatus::Downloading => {
                let percent = event
                    .downloaded_bytes
                    .zip(event.effective_total())
                    .and_then(|(done, total)| compute_percent(done, total));
                if let Some(percent) = percent {
                    record.percent = percent;
                    record.status = format!("Downloading... {}%", percent);
                }
                if let Some(filename) = &event.filename {
                    record.filename = Some(filename.clone());
                }
            }
            EventStatus::Finished => {
                record.percent = 100;
                record.status = STATUS_COMPLETE.to_string();
                if let Some(filename) = &event.filename {
                    record.filename = Some(filename.clone());
                }
            }
            EventStatus::Other => {}
        }
    }

    pub fn mark_queued(&self) {
        let mut record = self.record.write();
        record.state = JobState::Queued;
        record.status = STATUS_QUEUED.to_string();
    }

    pub fn mark_running(&self) {
        let mut record = self.record.write();
        record.state = JobState::Running;
        record.status = STATUS_PREPARING.to_string();
    }

    pub fn mark_completed(&self) {
        let mut record = self.record.write();
        record.state = JobState::Completed;
        record.percent = 100;
        record.status = STATUS_COMPLETE.to_string();
    }

    pub fn mark_failed(&self, description: &str) {
        let mut record = self.record.write();
        record.state = JobState::Failed;
        record.error = Some(description.to_string());
        record.status = format!("Download failed: {}", description);
    }

    pub fn snapshot(&self) -> ProgressRecord {
        self.record.read().clone()
    }

    pub fn is_active(&self) -> bool {
        self.record.read().is_active()
    }

    /// True when both handles point at the same record
    pub fn same_job(&self, other: &ProgressTracker) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }
}
