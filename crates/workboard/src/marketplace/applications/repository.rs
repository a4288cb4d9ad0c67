use super::domain::{ApplicationId, ApplicationRecord};
use crate::marketplace::store::RepositoryError;

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn for_job(&self, job_id: &str) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}
