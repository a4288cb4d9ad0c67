use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, JobApplication};
use super::repository::ApplicationRepository;
use super::validation::missing_required_fields;
use crate::marketplace::store::{Notification, Notifier, RepositoryError};
use crate::marketplace::wizard::{StepErrors, WizardForm};

/// Service composing completeness checks, step validation, persistence and notifications.
pub struct JobApplicationService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R, N> JobApplicationService<R, N>
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub fn validate_step(
        &self,
        application: &JobApplication,
        step: u8,
    ) -> Result<StepErrors, ApplicationServiceError> {
        if step == 0 || step > JobApplication::STEPS {
            return Err(ApplicationServiceError::InvalidStep { step });
        }
        Ok(application.validate_step(step, &()))
    }

    /// Submit a new application, returning the repository-backed record.
    pub fn submit(
        &self,
        application: JobApplication,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let application = application.normalized();
        Self::ensure_submittable(&application)?;

        let now = Utc::now();
        let record = ApplicationRecord {
            id: next_application_id(),
            application: JobApplication {
                status: ApplicationStatus::Submitted,
                ..application
            },
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(application_id = %stored.id, job_id = %stored.application.job_id, "application submitted");
        self.notify_employer(&stored);
        Ok(stored)
    }

    /// Persist a partial application without validation, updating an existing draft when given.
    pub fn save_draft(
        &self,
        draft_id: Option<&ApplicationId>,
        application: JobApplication,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let application = JobApplication {
            status: ApplicationStatus::Draft,
            ..application.normalized()
        };

        match draft_id {
            Some(id) => {
                let mut record = self.fetch_existing(id)?;
                if record.status() != ApplicationStatus::Draft {
                    return Err(ApplicationServiceError::InvalidTransition {
                        from: record.status(),
                        to: ApplicationStatus::Draft,
                    });
                }
                record.application = application;
                record.updated_at = Utc::now();
                self.repository.update(record.clone())?;
                info!(application_id = %record.id, "application draft updated");
                Ok(record)
            }
            None => {
                let now = Utc::now();
                let record = ApplicationRecord {
                    id: next_application_id(),
                    application,
                    created_at: now,
                    updated_at: now,
                };
                let stored = self.repository.insert(record)?;
                info!(application_id = %stored.id, "application draft saved");
                Ok(stored)
            }
        }
    }

    /// Submit a previously saved draft.
    pub fn submit_draft(
        &self,
        id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut record = self.fetch_existing(id)?;
        if record.status() != ApplicationStatus::Draft {
            return Err(ApplicationServiceError::InvalidTransition {
                from: record.status(),
                to: ApplicationStatus::Submitted,
            });
        }

        record.application = record.application.normalized();
        Self::ensure_submittable(&record.application)?;
        record.application.status = ApplicationStatus::Submitted;
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;
        info!(application_id = %record.id, "application draft submitted");
        self.notify_employer(&record);
        Ok(record)
    }

    /// Move an application through its lifecycle, notifying the applicant of decisions.
    pub fn transition(
        &self,
        id: &ApplicationId,
        next: ApplicationStatus,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut record = self.fetch_existing(id)?;
        let current = record.status();
        if !current.can_transition_to(next) {
            warn!(application_id = %id, from = current.label(), to = next.label(), "rejected status transition");
            return Err(ApplicationServiceError::InvalidTransition {
                from: current,
                to: next,
            });
        }
        if next == ApplicationStatus::Submitted {
            Self::ensure_submittable(&record.application)?;
        }

        record.application.status = next;
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;
        info!(application_id = %id, from = current.label(), to = next.label(), "application status changed");

        match next {
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => {
                let template = format!("application_{}", next.label());
                self.send(
                    Notification::new(template, record.application.applicant_id.clone())
                        .with_detail("application_id", record.id.0.clone())
                        .with_detail("job_id", record.application.job_id.clone()),
                );
            }
            ApplicationStatus::Submitted => self.notify_employer(&record),
            ApplicationStatus::Draft | ApplicationStatus::UnderReview => {}
        }

        Ok(record)
    }

    /// Fetch an application and current status for API responses.
    pub fn get(&self, id: &ApplicationId) -> Result<ApplicationRecord, ApplicationServiceError> {
        self.fetch_existing(id)
    }

    pub fn for_job(&self, job_id: &str) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.repository.for_job(job_id)?)
    }

    fn fetch_existing(
        &self,
        id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn ensure_submittable(application: &JobApplication) -> Result<(), ApplicationServiceError> {
        let missing = missing_required_fields(application);
        if !missing.is_empty() {
            warn!(job_id = %application.job_id, missing = ?missing, "incomplete application rejected");
            return Err(ApplicationServiceError::Incomplete { missing });
        }

        if let Some((step, errors)) = application.first_invalid_step(&()) {
            warn!(job_id = %application.job_id, step, "application rejected by validation");
            return Err(ApplicationServiceError::Invalid { step, errors });
        }

        Ok(())
    }

    fn notify_employer(&self, record: &ApplicationRecord) {
        self.send(
            Notification::new(
                "application_received",
                format!("job:{}", record.application.job_id),
            )
            .with_detail("application_id", record.id.0.clone())
            .with_detail("applicant_id", record.application.applicant_id.clone()),
        );
    }

    fn send(&self, notification: Notification) {
        let template = notification.template.clone();
        if let Err(err) = self.notifier.notify(notification) {
            warn!(%template, error = %err, "notification delivery failed");
        }
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("application is incomplete; missing {}", .missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },
    #[error("application step {step} is invalid")]
    Invalid { step: u8, errors: StepErrors },
    #[error("step {step} does not exist")]
    InvalidStep { step: u8 },
    #[error("cannot move application from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
