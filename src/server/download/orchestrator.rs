use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::engine::{DownloadEngine, EngineJob};
use super::error::Result;
use super::session::SessionStore;
use super::storage;
use super::tracker::{ProgressEvent, ProgressTracker};
use super::types::DownloadRequest;

/// Starts one background task per download request.
///
/// At most `max_concurrent` engine calls run at the same time; the rest
/// wait as queued. Submitting never waits for a slot.
pub struct Orchestrator {
    engine: Arc<dyn DownloadEngine>,
    permits: Arc<Semaphore>,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn DownloadEngine>, max_concurrent: usize) -> Self {
        Self {
            engine,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn engine(&self) -> &Arc<dyn DownloadEngine> {
        &self.engine
    }

    /// Register and launch a download.
    ///
    /// Only directory creation can fail here; engine faults end up in the
    /// returned tracker.
    pub fn submit(&self, store: &SessionStore, request: DownloadRequest) -> Result<ProgressTracker> {
        storage::ensure_directory(Path::new(&request.destination))?;

        let tracker = ProgressTracker::new(&request);
        store.upsert(request.url.clone(), tracker.clone());

        if self.permits.available_permits() == 0 {
            tracker.mark_queued();
        }

        tracing::info!(
            "Submitting download: url={}, type={:?}, quality={:?}, dir={}",
            request.url,
            request.media_type,
            request.quality,
            request.destination
        );

        tokio::spawn(run_download(
            Arc::clone(&self.engine),
            Arc::clone(&self.permits),
            request,
            tracker.clone(),
        ));

        Ok(tracker)
    }
}

async fn run_download(
    engine: Arc<dyn DownloadEngine>,
    permits: Arc<Semaphore>,
    request: DownloadRequest,
    tracker: ProgressTracker,
) {
    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            tracker.mark_failed("download queue is closed");
            return;
        }
    };

    tracker.mark_running();
    let job = EngineJob::from_request(&request);
    let on_progress = |event: ProgressEvent| tracker.on_event(&event);

    let outcome = AssertUnwindSafe(engine.download(&job, &on_progress))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(())) => {
            tracing::info!("Download finished: {}", request.url);
            tracker.mark_completed();
        }
        Ok(Err(e)) => {
            tracing::error!("Download failed for {}: {}", request.url, e);
            tracker.mark_failed(&e.to_string());
        }
        Err(_) => {
            tracing::error!("Download task panicked for {}", request.url);
            tracker.mark_failed("download task panicked");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::server::download::engine::ProgressCallback;
    use crate::server::download::error::{DownloadError, EngineError};
    use crate::server::download::tracker::STATUS_COMPLETE;
    use crate::server::download::types::{JobState, MediaType, Quality, VideoInfo};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Script = dyn Fn(&EngineJob, ProgressCallback<'_>) -> std::result::Result<(), EngineError>
        + Send
        + Sync;

    /// Engine that runs a closure instead of yt-dlp
    pub(crate) struct ScriptedEngine {
        script: Box<Script>,
        pub(crate) calls: AtomicUsize,
    }

    impl ScriptedEngine {
        pub(crate) fn new(
            script: impl Fn(&EngineJob, ProgressCallback<'_>) -> std::result::Result<(), EngineError>
                + Send
                + Sync
                + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Box::new(script),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DownloadEngine for ScriptedEngine {
        async fn fetch_info(&self, url: &str) -> std::result::Result<VideoInfo, EngineError> {
            Ok(VideoInfo {
                title: Some(format!("Info for {}", url)),
                ..VideoInfo::default()
            })
        }

        async fn download(
            &self,
            job: &EngineJob,
            on_progress: ProgressCallback<'_>,
        ) -> std::result::Result<(), EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            (self.script)(job, on_progress)
        }
    }

    fn request(url: &str, dir: &Path, quality: Quality) -> DownloadRequest {
        DownloadRequest {
            url: url.into(),
            quality,
            media_type: MediaType::Video,
            destination: dir.to_string_lossy().to_string(),
        }
    }

    /// Directory the job's output template points into
    fn job_dir(job: &EngineJob) -> PathBuf {
        PathBuf::from(&job.output_template)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    async fn settle(tracker: &ProgressTracker) {
        for _ in 0..500 {
            if !tracker.is_active() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("download never settled: {:?}", tracker.snapshot());
    }

    #[tokio::test]
    async fn finished_download_shows_up_in_listing() {
        let root = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(|job, on_progress| {
            on_progress(ProgressEvent::downloading(512.0, Some(1024.0), None));
            let path = job_dir(job).join("v1.mp4");
            std::fs::write(&path, vec![7u8; 2 * 1024 * 1024]).map_err(EngineError::Io)?;
            on_progress(ProgressEvent::finished(Some("v1.mp4")));
            Ok(())
        });
        let orchestrator = Orchestrator::new(engine, 2);
        let store = SessionStore::new(10);

        let tracker = orchestrator
            .submit(&store, request("https://example.com/v1", root.path(), Quality::Best))
            .unwrap();
        settle(&tracker).await;

        let record = tracker.snapshot();
        assert_eq!(record.percent, 100);
        assert_eq!(record.status, STATUS_COMPLETE);
        assert_eq!(record.state, JobState::Completed);
        assert_eq!(record.filename.as_deref(), Some("v1.mp4"));

        let files = storage::list_files(root.path()).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "v1.mp4");
        assert_eq!(files[0].display_size(), "2.0 MB");
    }

    #[tokio::test]
    async fn engine_fault_is_captured_in_record() {
        let root = tempfile::tempdir().unwrap();
        let engine =
            ScriptedEngine::new(|_, _| Err(EngineError::Fault("network error".to_string())));
        let orchestrator = Orchestrator::new(engine, 1);
        let store = SessionStore::new(10);

        let tracker = orchestrator
            .submit(&store, request("https://example.com/v2", root.path(), Quality::Best))
            .unwrap();
        settle(&tracker).await;

        let record = tracker.snapshot();
        assert_eq!(record.error.as_deref(), Some("network error"));
        assert!(record.status.contains("network error"));
        assert_eq!(record.state, JobState::Failed);
    }

    #[tokio::test]
    async fn panicking_engine_marks_failure() {
        let root = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(|_, _| panic!("engine blew up"));
        let orchestrator = Orchestrator::new(engine, 1);
        let store = SessionStore::new(10);

        let tracker = orchestrator
            .submit(&store, request("https://example.com/v3", root.path(), Quality::Best))
            .unwrap();
        settle(&tracker).await;
        assert_eq!(tracker.snapshot().state, JobState::Failed);
    }

    #[tokio::test]
    async fn distinct_urls_are_tracked_independently() {
        let root = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(|job, on_progress| {
            if job.url.ends_with("/bad") {
                return Err(EngineError::Fault("unsupported URL".to_string()));
            }
            on_progress(ProgressEvent::finished(Some("good.mp4")));
            Ok(())
        });
        let orchestrator = Orchestrator::new(engine, 4);
        let store = SessionStore::new(10);

        let good = orchestrator
            .submit(&store, request("https://example.com/good", root.path(), Quality::Best))
            .unwrap();
        let bad = orchestrator
            .submit(&store, request("https://example.com/bad", root.path(), Quality::Best))
            .unwrap();
        settle(&good).await;
        settle(&bad).await;

        assert_eq!(store.len(), 2);
        assert_eq!(good.snapshot().state, JobState::Completed);
        assert_eq!(good.snapshot().error, None);
        assert_eq!(bad.snapshot().state, JobState::Failed);
        assert_eq!(bad.snapshot().filename, None);
    }

    #[tokio::test]
    async fn resubmitting_a_url_keeps_only_the_latest_record() {
        let root = tempfile::tempdir().unwrap();
        let engine = ScriptedEngine::new(|job, on_progress| {
            if job.format == "worst" {
                return Err(EngineError::Fault("first attempt".to_string()));
            }
            on_progress(ProgressEvent::finished(Some("v1.mp4")));
            Ok(())
        });
        let orchestrator = Orchestrator::new(engine, 4);
        let store = SessionStore::new(10);
        let url = "https://example.com/v1";

        let first = orchestrator
            .submit(&store, request(url, root.path(), Quality::Worst))
            .unwrap();
        let second = orchestrator
            .submit(&store, request(url, root.path(), Quality::Best))
            .unwrap();
        settle(&first).await;
        settle(&second).await;

        assert_eq!(store.len(), 1);
        let tracked = store.get(url).unwrap();
        assert!(tracked.same_job(&second));
        let record = store.get_all().remove(0).record;
        assert_eq!(record.request.quality, Quality::Best);
        assert_eq!(record.state, JobState::Completed);
        assert_eq!(record.error, None);
    }

    #[tokio::test]
    async fn missing_directory_is_created_before_engine_runs() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("fresh").join("downloads");
        let engine = ScriptedEngine::new(|job, _| {
            if job_dir(job).is_dir() {
                Ok(())
            } else {
                Err(EngineError::Fault("directory missing".to_string()))
            }
        });
        let orchestrator = Orchestrator::new(engine.clone(), 1);
        let store = SessionStore::new(10);

        let tracker = orchestrator
            .submit(&store, request("https://example.com/v4", &target, Quality::Best))
            .unwrap();
        settle(&tracker).await;
        assert!(target.is_dir());
        assert_eq!(tracker.snapshot().state, JobState::Completed);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn directory_failure_spawns_nothing() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let engine = ScriptedEngine::new(|_, _| Ok(()));
        let orchestrator = Orchestrator::new(engine.clone(), 1);
        let store = SessionStore::new(10);

        let result = orchestrator.submit(
            &store,
            request("https://example.com/v5", &blocker.join("sub"), Quality::Best),
        );
        assert!(matches!(result, Err(DownloadError::CreateDirectory { .. })));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.is_empty());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn excess_jobs_wait_for_a_slot() {
        let root = tempfile::tempdir().unwrap();
        let gate = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let gate_for_engine = Arc::clone(&gate);
        let engine = ScriptedEngine::new(move |_, _| {
            while !gate_for_engine.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        });
        let orchestrator = Orchestrator::new(engine, 1);
        let store = SessionStore::new(10);

        let first = orchestrator
            .submit(&store, request("https://example.com/a", root.path(), Quality::Best))
            .unwrap();
        // let the first job take the only slot
        for _ in 0..200 {
            if first.snapshot().state == JobState::Running {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let second = orchestrator
            .submit(&store, request("https://example.com/b", root.path(), Quality::Best))
            .unwrap();
        assert_eq!(second.snapshot().state, JobState::Queued);
        assert_eq!(second.snapshot().status, "Queued...");

        gate.store(true, Ordering::SeqCst);
        settle(&first).await;
        settle(&second).await;
        assert_eq!(second.snapshot().state, JobState::Completed);
    }
}
