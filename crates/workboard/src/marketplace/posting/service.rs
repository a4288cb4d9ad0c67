use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{JobPost, JobPostFormData, JobPostId, JobPostStatus};
use super::repository::JobPostStore;
use super::validation::PostingRules;
use crate::marketplace::store::RepositoryError;
use crate::marketplace::wizard::{StepErrors, WizardForm};

/// Service handing validated job posts (and unvalidated drafts) to the external store.
pub struct JobPostService<S> {
    store: Arc<S>,
    rules: PostingRules,
}

static JOB_POST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_post_id() -> JobPostId {
    let id = JOB_POST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobPostId(format!("job-{id:06}"))
}

impl<S> JobPostService<S>
where
    S: JobPostStore + 'static,
{
    pub fn new(store: Arc<S>, rules: PostingRules) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> PostingRules {
        self.rules
    }

    pub fn validate_step(
        &self,
        form: &JobPostFormData,
        step: u8,
    ) -> Result<StepErrors, JobPostServiceError> {
        if step == 0 || step > JobPostFormData::STEPS {
            return Err(JobPostServiceError::InvalidStep { step });
        }
        Ok(form.validate_step(step, &self.rules))
    }

    /// Validate every step, normalize and persist as a published post.
    pub fn publish(
        &self,
        employer_id: &str,
        form: JobPostFormData,
    ) -> Result<JobPost, JobPostServiceError> {
        let form = form.normalized();
        self.ensure_complete(&form)?;

        let post = JobPost {
            id: next_job_post_id(),
            employer_id: employer_id.to_string(),
            status: JobPostStatus::Published,
            form,
            updated_at: Utc::now(),
        };

        let stored = self.store.insert(post)?;
        info!(job_post_id = %stored.id.0, employer_id, "job post published");
        Ok(stored)
    }

    /// Persist the partial record without validation, updating an existing draft when given.
    /// Only the employer who created a draft may overwrite it.
    pub fn save_draft(
        &self,
        employer_id: &str,
        draft_id: Option<&JobPostId>,
        form: JobPostFormData,
    ) -> Result<JobPost, JobPostServiceError> {
        let form = form.normalized();
        match draft_id {
            Some(id) => {
                let mut existing = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
                if existing.employer_id != employer_id {
                    warn!(job_post_id = %id, employer_id, "draft update by another employer refused");
                    return Err(JobPostServiceError::NotOwner(id.clone()));
                }
                if existing.status == JobPostStatus::Published {
                    return Err(JobPostServiceError::AlreadyPublished(id.clone()));
                }
                existing.form = form;
                existing.updated_at = Utc::now();
                self.store.update(existing.clone())?;
                info!(job_post_id = %existing.id.0, "job post draft updated");
                Ok(existing)
            }
            None => {
                let draft = JobPost {
                    id: next_job_post_id(),
                    employer_id: employer_id.to_string(),
                    status: JobPostStatus::Draft,
                    form,
                    updated_at: Utc::now(),
                };
                let stored = self.store.insert(draft)?;
                info!(job_post_id = %stored.id.0, employer_id, "job post draft saved");
                Ok(stored)
            }
        }
    }

    /// Promote a stored draft once every step validates.
    pub fn publish_draft(&self, id: &JobPostId) -> Result<JobPost, JobPostServiceError> {
        let mut post = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if post.status == JobPostStatus::Published {
            return Err(JobPostServiceError::AlreadyPublished(id.clone()));
        }

        post.form = post.form.normalized();
        self.ensure_complete(&post.form)?;
        post.status = JobPostStatus::Published;
        post.updated_at = Utc::now();
        self.store.update(post.clone())?;
        info!(job_post_id = %post.id.0, "job post draft published");
        Ok(post)
    }

    pub fn get(&self, id: &JobPostId) -> Result<JobPost, JobPostServiceError> {
        let post = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(post)
    }

    pub fn published(&self) -> Result<Vec<JobPost>, JobPostServiceError> {
        Ok(self.store.list(JobPostStatus::Published)?)
    }

    fn ensure_complete(&self, form: &JobPostFormData) -> Result<(), JobPostServiceError> {
        if let Some((step, errors)) = form.first_invalid_step(&self.rules) {
            warn!(step, fields = %errors.summary(), "job post rejected by validation");
            return Err(JobPostServiceError::Incomplete { step, errors });
        }
        Ok(())
    }
}

/// Error raised by the job post service.
#[derive(Debug, thiserror::Error)]
pub enum JobPostServiceError {
    #[error("step {step} does not exist")]
    InvalidStep { step: u8 },
    #[error("job post step {step} is incomplete")]
    Incomplete { step: u8, errors: StepErrors },
    #[error("job post {0} is already published")]
    AlreadyPublished(JobPostId),
    #[error("job post {0} belongs to another employer")]
    NotOwner(JobPostId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
