//! Marketplace domain: wizards, validators, listings and the collaboration features
//! layered on top of them.

pub mod applications;
pub mod collectives;
pub mod domain;
pub mod listing;
pub mod messaging;
pub mod posting;
pub mod profiles;
pub mod store;
pub mod sublist;
pub mod wizard;
