//! Multi-step job posting: form record, step validators, persistence handoff and routes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

pub use domain::{JobPost, JobPostFormData, JobPostId, JobPostStatus, LanguagePolicy};
pub use repository::JobPostStore;
pub use router::job_post_router;
pub use service::{JobPostService, JobPostServiceError};
pub use validation::{GateRule, PostingRules};
