use crate::client::BackendClient;
use crate::config::Config;
use crate::models::DashboardSnapshot;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendClient,
    pub snapshot: Arc<Mutex<Option<DashboardSnapshot>>>,
    generation: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backend = BackendClient::new(config.backend_url.clone());
        Self {
            config: Arc::new(config),
            backend,
            snapshot: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Issues the generation for a new refresh request.
    pub fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Stores `snapshot` only if no newer request has been issued since it started.
    pub async fn publish(&self, snapshot: DashboardSnapshot) -> bool {
        let mut slot = self.snapshot.lock().await;
        if snapshot.generation != self.latest_generation() {
            return false;
        }
        *slot = Some(snapshot);
        true
    }

    pub async fn current(&self) -> Option<DashboardSnapshot> {
        self.snapshot.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.snapshot.lock().await.take();
    }
}
