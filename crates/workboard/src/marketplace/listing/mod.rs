//! Find-work and hire-workers listings: catalog, filter criteria and routes.

pub mod catalog;
pub mod domain;
pub mod filter;
pub mod router;

pub use catalog::{Catalog, CatalogError};
pub use domain::{JobListing, WorkerProfile};
pub use filter::{filter_listings, sort_by_pay, FilterCriteria, Listing, PaySort};
pub use router::listing_router;
