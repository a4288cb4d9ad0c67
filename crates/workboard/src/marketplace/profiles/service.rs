use std::sync::Arc;

use tracing::{info, warn};

use super::domain::ProfileUpdate;
use super::repository::ProfileStore;
use crate::marketplace::listing::WorkerProfile;
use crate::marketplace::store::RepositoryError;
use crate::marketplace::wizard::StepErrors;

pub struct ProfileService<S> {
    store: Arc<S>,
}

impl<S> ProfileService<S>
where
    S: ProfileStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create or replace the profile for `worker_id`. Input is normalized before it is
    /// validated, so stored lists never carry repeats or blanks.
    pub fn upsert(
        &self,
        worker_id: &str,
        update: ProfileUpdate,
    ) -> Result<WorkerProfile, ProfileServiceError> {
        let worker_id = worker_id.trim();
        if worker_id.is_empty() {
            return Err(ProfileServiceError::MissingWorker);
        }

        let update = update.normalized();
        let errors = update.validate();
        if !errors.is_empty() {
            warn!(%worker_id, fields = %errors.summary(), "profile update rejected");
            return Err(ProfileServiceError::Invalid { errors });
        }

        let existing = self.store.fetch(worker_id)?;
        let created = existing.is_none();
        let profile = update.apply(worker_id, existing.as_ref());
        let stored = self.store.upsert(profile)?;
        info!(%worker_id, created, "worker profile saved");
        Ok(stored)
    }

    pub fn get(&self, worker_id: &str) -> Result<WorkerProfile, ProfileServiceError> {
        let profile = self
            .store
            .fetch(worker_id.trim())?
            .ok_or(RepositoryError::NotFound)?;
        Ok(profile)
    }

    /// Every stored profile ordered by worker id.
    pub fn list(&self) -> Result<Vec<WorkerProfile>, ProfileServiceError> {
        let mut profiles = self.store.list()?;
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error("worker id is required")]
    MissingWorker,
    #[error("profile has invalid fields: {}", .errors.summary())]
    Invalid { errors: StepErrors },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
