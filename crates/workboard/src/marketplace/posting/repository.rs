use super::domain::{JobPost, JobPostId, JobPostStatus};
use crate::marketplace::store::RepositoryError;

/// Storage abstraction for job posts so the service can be exercised in isolation.
pub trait JobPostStore: Send + Sync {
    fn insert(&self, post: JobPost) -> Result<JobPost, RepositoryError>;
    fn update(&self, post: JobPost) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &JobPostId) -> Result<Option<JobPost>, RepositoryError>;
    fn list(&self, status: JobPostStatus) -> Result<Vec<JobPost>, RepositoryError>;
}
