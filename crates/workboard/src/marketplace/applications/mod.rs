//! Multi-step job application: record, step validators, lifecycle and routes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationStatusView, Availability,
    JobApplication, Reference,
};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::{ApplicationServiceError, JobApplicationService};
pub use validation::missing_required_fields;
