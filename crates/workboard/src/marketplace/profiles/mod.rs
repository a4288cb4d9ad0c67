//! Worker profile management: the editable fields behind a hire-workers card.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ProfileUpdate, MAX_RATING};
pub use repository::ProfileStore;
pub use router::profile_router;
pub use service::{ProfileService, ProfileServiceError};
