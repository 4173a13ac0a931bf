use std::sync::{Arc, Once, OnceLock};
use std::time::Duration;

use super::config::ServerConfig;
use super::engine::DownloadEngine;
use super::orchestrator::Orchestrator;
use super::session::{Session, SessionRegistry};
use super::types::SessionId;
use super::ytdlp::YtDlpEngine;

/// The server-wide state behind every server function
static APP_STATE: OnceLock<AppState> = OnceLock::new();
static SWEEPER: Once = Once::new();

/// Everything a server function needs to serve a session
pub struct AppState {
    pub config: ServerConfig,
    pub orchestrator: Orchestrator,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: ServerConfig, engine: Arc<dyn DownloadEngine>) -> Self {
        let orchestrator = Orchestrator::new(engine, config.max_concurrent_downloads);
        let sessions = Arc::new(SessionRegistry::new(
            config.session_ttl,
            config.max_records_per_session,
        ));
        Self {
            config,
            orchestrator,
            sessions,
        }
    }

    pub fn engine(&self) -> &Arc<dyn DownloadEngine> {
        self.orchestrator.engine()
    }

    /// Session for `id`, touching it so it stays alive
    pub fn session(&self, id: &SessionId) -> Arc<Session> {
        self.sessions.resolve(id)
    }
}

/// Read configuration from the environment and build the state once
pub fn init_app_state() -> &'static AppState {
    APP_STATE.get_or_init(|| {
        let config = ServerConfig::from_env();
        tracing::info!("Starting with configuration: {:?}", config);
        let engine: Arc<dyn DownloadEngine> = Arc::new(YtDlpEngine::new(
            config.yt_dlp_path.clone(),
            config.socket_timeout_secs,
        ));
        AppState::new(config, engine)
    })
}

/// Shared state; also starts the idle-session sweeper on first use
pub fn app_state() -> &'static AppState {
    let state = init_app_state();
    SWEEPER.call_once(|| spawn_session_sweeper(Arc::clone(&state.sessions)));
    state
}

/// Periodically drop sessions that went quiet
fn spawn_session_sweeper(sessions: Arc<SessionRegistry>) {
    let period = (sessions.ttl() / 4).clamp(Duration::from_secs(5), Duration::from_secs(300));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            sessions.evict_idle();
        }
    });
    tracing::info!("Session sweeper running every {:?}", period);
}
