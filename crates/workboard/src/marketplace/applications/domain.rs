use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::sublist::{
    dedup_values, push_unique, remove_value, DedupKey, EntryId, KeyedList,
};

/// Identifier wrapper for persisted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Professional reference supplied by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub name: String,
    pub title: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

impl DedupKey for Reference {
    fn dedup_key(&self) -> String {
        format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
            self.name, self.title, self.company, self.phone, self.email
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    /// Calendar date as `YYYY-MM-DD`; empty until the applicant picks one.
    pub start_date: String,
    pub days_per_week: Option<u8>,
    pub hours_per_day: Option<u8>,
}

/// Lifecycle of an application from the first saved draft to the employer's decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        match self {
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => true,
            ApplicationStatus::Draft
            | ApplicationStatus::Submitted
            | ApplicationStatus::UnderReview => false,
        }
    }

    pub const fn can_transition_to(self, next: ApplicationStatus) -> bool {
        match (self, next) {
            (ApplicationStatus::Draft, ApplicationStatus::Submitted) => true,
            (ApplicationStatus::Submitted, ApplicationStatus::UnderReview)
            | (ApplicationStatus::Submitted, ApplicationStatus::Rejected) => true,
            (ApplicationStatus::UnderReview, ApplicationStatus::Accepted)
            | (ApplicationStatus::UnderReview, ApplicationStatus::Rejected) => true,
            _ => false,
        }
    }
}

/// Application record mutated step by step by the application wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplication {
    pub job_id: String,
    pub applicant_id: String,
    pub introduction: String,
    pub references: KeyedList<Reference>,
    pub availability: Availability,
    pub confirm_skills: Vec<String>,
    pub status: ApplicationStatus,
}

impl JobApplication {
    pub fn new(job_id: impl Into<String>, applicant_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            applicant_id: applicant_id.into(),
            ..Self::default()
        }
    }

    pub fn add_reference(&mut self, reference: Reference) -> Option<EntryId> {
        self.references.add(reference)
    }

    pub fn remove_reference(&mut self, id: EntryId) -> Option<Reference> {
        self.references.remove(id)
    }

    pub fn confirm_skill(&mut self, skill: impl Into<String>) -> bool {
        push_unique(&mut self.confirm_skills, skill)
    }

    pub fn unconfirm_skill(&mut self, skill: &str) -> bool {
        remove_value(&mut self.confirm_skills, skill)
    }

    /// Trim identity and free text, collapsing repeated confirmed skills.
    pub fn normalized(mut self) -> Self {
        self.job_id = self.job_id.trim().to_string();
        self.applicant_id = self.applicant_id.trim().to_string();
        self.introduction = self.introduction.trim().to_string();
        self.confirm_skills = dedup_values(&self.confirm_skills);
        self
    }
}

/// Repository record wrapping the application with persistence metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub application: JobApplication,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn status(&self) -> ApplicationStatus {
        self.application.status
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            job_id: self.application.job_id.clone(),
            status: self.application.status.label(),
            terminal: self.application.status.is_terminal(),
            updated_at: self.updated_at,
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub job_id: String,
    pub status: &'static str,
    pub terminal: bool,
    pub updated_at: DateTime<Utc>,
}
