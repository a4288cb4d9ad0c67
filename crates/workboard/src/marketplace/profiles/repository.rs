use crate::marketplace::listing::WorkerProfile;
use crate::marketplace::store::RepositoryError;

/// Keyed by worker id; `upsert` replaces any stored profile for the same worker.
pub trait ProfileStore: Send + Sync {
    fn upsert(&self, profile: WorkerProfile) -> Result<WorkerProfile, RepositoryError>;
    fn fetch(&self, worker_id: &str) -> Result<Option<WorkerProfile>, RepositoryError>;
    fn list(&self) -> Result<Vec<WorkerProfile>, RepositoryError>;
}
