//! Worker collectives: shared profile plus a keyed member roster.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Collective, CollectiveId, CollectiveMember, MemberRole};
pub use repository::CollectiveStore;
pub use router::collective_router;
pub use service::{CollectiveService, CollectiveServiceError, NewCollective};
