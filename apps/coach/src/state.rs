use std::sync::Arc;

use tokio::sync::RwLock;

use crate::committee::Committee;
use crate::jobs::store::JobStore;
use crate::jobs::JobBoard;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Hiring committee; one chat client per reviewer role.
    pub committee: Committee,
    pub jobs: Arc<RwLock<JobBoard>>,
    /// Persistence for `jobs`. File-backed when JOBS_FILE is set, otherwise in-memory.
    pub job_store: Arc<dyn JobStore>,
}

impl AppState {
    pub fn new(committee: Committee, board: JobBoard, job_store: Arc<dyn JobStore>) -> Self {
        Self {
            committee,
            jobs: Arc::new(RwLock::new(board)),
            job_store,
        }
    }
}
