use super::domain::{Collective, CollectiveId};
use crate::marketplace::store::RepositoryError;

pub trait CollectiveStore: Send + Sync {
    fn insert(&self, collective: Collective) -> Result<Collective, RepositoryError>;
    fn update(&self, collective: Collective) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CollectiveId) -> Result<Option<Collective>, RepositoryError>;
}
