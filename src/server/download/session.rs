use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::tracker::ProgressTracker;
use super::types::{SessionId, TrackedDownload};

/// Downloads tracked for one session, keyed by URL in submission order.
///
/// Holds at most `capacity` entries; the oldest finished entries make room
/// for new ones. Active downloads are never dropped.
#[derive(Debug)]
pub struct SessionStore {
    entries: RwLock<Vec<(String, ProgressTracker)>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// Track `tracker` under `url`, replacing any earlier entry for it
    pub fn upsert(&self, url: String, tracker: ProgressTracker) {
        let mut entries = self.entries.write();
        if let Some(slot) = entries.iter_mut().find(|(key, _)| *key == url) {
            slot.1 = tracker;
            return;
        }

        entries.push((url, tracker));
        while entries.len() > self.capacity {
            match entries.iter().position(|(_, t)| !t.is_active()) {
                Some(oldest) => {
                    let (evicted, _) = entries.remove(oldest);
                    tracing::debug!("Evicted finished download {}", evicted);
                }
                None => break,
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<ProgressTracker> {
        self.entries
            .read()
            .iter()
            .find(|(key, _)| key == url)
            .map(|(_, tracker)| tracker.clone())
    }

    pub fn get_all(&self) -> Vec<TrackedDownload> {
        self.entries
            .read()
            .iter()
            .map(|(url, tracker)| TrackedDownload {
                url: url.clone(),
                record: tracker.snapshot(),
            })
            .collect()
    }

    pub fn has_active(&self) -> bool {
        self.entries.read().iter().any(|(_, t)| t.is_active())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One browser session and the downloads it started
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub store: SessionStore,
    last_seen: Mutex<Instant>,
}

impl Session {
    fn new(id: SessionId, capacity: usize) -> Self {
        Self {
            id,
            store: SessionStore::new(capacity),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }
}

/// All live sessions
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    ttl: Duration,
    records_per_session: usize,
}

impl SessionRegistry {
    pub fn new(ttl: Duration, records_per_session: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            records_per_session,
        }
    }

    /// Start a fresh session
    pub fn open(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(
            SessionId::generate(),
            self.records_per_session,
        ));
        self.sessions
            .write()
            .insert(session.id.clone(), Arc::clone(&session));
        tracing::info!("Opened session {}", session.id);
        session
    }

    /// Look up a session, recreating it empty if the handle is unknown
    /// (evicted, or issued before a restart)
    pub fn resolve(&self, id: &SessionId) -> Arc<Session> {
        if let Some(session) = self.sessions.read().get(id) {
            session.touch();
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write();
        let session = sessions.entry(id.clone()).or_insert_with(|| {
            tracing::info!("Restoring unknown session {}", id);
            Arc::new(Session::new(id.clone(), self.records_per_session))
        });
        session.touch();
        Arc::clone(session)
    }

    /// Drop sessions idle longer than the TTL that have nothing running
    pub fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.idle_for() < self.ttl || session.store.has_active()
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!("Evicted {} idle session(s)", evicted);
        }
        evicted
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::download::types::{DownloadRequest, JobState, MediaType, Quality};

    fn tracker_for(url: &str) -> ProgressTracker {
        ProgressTracker::new(&DownloadRequest {
            url: url.into(),
            quality: Quality::Best,
            media_type: MediaType::Video,
            destination: "./downloads".into(),
        })
    }

    #[test]
    fn upsert_replaces_entry_in_place() {
        let store = SessionStore::new(10);
        store.upsert("a".into(), tracker_for("a"));
        store.upsert("b".into(), tracker_for("b"));
        let replacement = tracker_for("a");
        store.upsert("a".into(), replacement.clone());

        let urls: Vec<_> = store.get_all().into_iter().map(|d| d.url).collect();
        assert_eq!(urls, vec!["a", "b"]);
        assert!(store.get("a").unwrap().same_job(&replacement));
    }

    #[test]
    fn capacity_evicts_oldest_finished_only() {
        let store = SessionStore::new(2);
        let first = tracker_for("1");
        let second = tracker_for("2");
        store.upsert("1".into(), first.clone());
        store.upsert("2".into(), second.clone());

        // nothing finished yet: the store grows past capacity
        store.upsert("3".into(), tracker_for("3"));
        assert_eq!(store.len(), 3);

        second.mark_completed();
        first.mark_failed("boom");
        store.upsert("4".into(), tracker_for("4"));

        let urls: Vec<_> = store.get_all().into_iter().map(|d| d.url).collect();
        assert_eq!(urls, vec!["3", "4"]);
        assert!(store.get_all().iter().all(|d| d.record.state == JobState::Queued));
    }

    #[test]
    fn registry_restores_unknown_sessions() {
        let registry = SessionRegistry::new(Duration::from_secs(60), 10);
        let opened = registry.open();
        assert!(Arc::ptr_eq(&opened, &registry.resolve(&opened.id)));

        let stranger = SessionId("from-before-restart".into());
        let restored = registry.resolve(&stranger);
        assert_eq!(restored.id, stranger);
        assert!(restored.store.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn idle_sessions_are_evicted_unless_busy() {
        let registry = SessionRegistry::new(Duration::ZERO, 10);
        let idle = registry.open();
        let busy = registry.open();
        busy.store.upsert("x".into(), tracker_for("x"));
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(registry.evict_idle(), 1);
        assert_eq!(registry.len(), 1);
        let remaining = registry.resolve(&busy.id);
        assert!(Arc::ptr_eq(&remaining, &busy));
        drop(idle);
    }
}
