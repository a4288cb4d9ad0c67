use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{Collective, CollectiveId, CollectiveMember, MemberRole};
use super::repository::CollectiveStore;
use crate::marketplace::store::RepositoryError;
use crate::marketplace::sublist::{EntryId, KeyedList};

/// Input for founding a collective; the founder becomes the first member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollective {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub trade: String,
    pub founder_id: String,
    pub founder_name: String,
}

pub struct CollectiveService<S> {
    store: Arc<S>,
}

static COLLECTIVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_collective_id() -> CollectiveId {
    let id = COLLECTIVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CollectiveId(format!("col-{id:06}"))
}

impl<S> CollectiveService<S>
where
    S: CollectiveStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, request: NewCollective) -> Result<Collective, CollectiveServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(CollectiveServiceError::MissingName);
        }
        if request.founder_id.trim().is_empty() {
            return Err(CollectiveServiceError::MissingWorker);
        }

        let mut members = KeyedList::new();
        members.add(CollectiveMember {
            worker_id: request.founder_id.trim().to_string(),
            display_name: request.founder_name.trim().to_string(),
            role: MemberRole::Founder,
        });

        let collective = Collective {
            id: next_collective_id(),
            name: name.to_string(),
            description: request.description.trim().to_string(),
            trade: request.trade.trim().to_string(),
            members,
            created_at: Utc::now(),
        };

        let stored = self.store.insert(collective)?;
        info!(collective_id = %stored.id, founder = %request.founder_id, "collective created");
        Ok(stored)
    }

    /// Add a worker to the roster. A worker already on it is rejected rather than re-added.
    pub fn add_member(
        &self,
        id: &CollectiveId,
        member: CollectiveMember,
    ) -> Result<(Collective, EntryId), CollectiveServiceError> {
        if member.worker_id.trim().is_empty() {
            return Err(CollectiveServiceError::MissingWorker);
        }

        let mut collective = self.fetch_existing(id)?;
        let worker_id = member.worker_id.clone();
        let member = CollectiveMember {
            role: MemberRole::Member,
            ..member
        };
        let Some(entry_id) = collective.members.add(member) else {
            warn!(collective_id = %id, %worker_id, "duplicate member ignored");
            return Err(CollectiveServiceError::AlreadyMember(worker_id));
        };

        self.store.update(collective.clone())?;
        info!(collective_id = %id, %worker_id, "member added");
        Ok((collective, entry_id))
    }

    pub fn remove_member(
        &self,
        id: &CollectiveId,
        entry_id: EntryId,
    ) -> Result<Collective, CollectiveServiceError> {
        let mut collective = self.fetch_existing(id)?;
        if collective.members.get(entry_id).is_none() {
            return Err(CollectiveServiceError::MemberNotFound(entry_id));
        }
        if collective.members.len() == 1 {
            return Err(CollectiveServiceError::LastMember);
        }

        if let Some(removed) = collective.members.remove(entry_id) {
            info!(collective_id = %id, worker_id = %removed.worker_id, "member removed");
        }
        self.store.update(collective.clone())?;
        Ok(collective)
    }

    pub fn get(&self, id: &CollectiveId) -> Result<Collective, CollectiveServiceError> {
        self.fetch_existing(id)
    }

    fn fetch_existing(&self, id: &CollectiveId) -> Result<Collective, CollectiveServiceError> {
        let collective = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(collective)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollectiveServiceError {
    #[error("collective name is required")]
    MissingName,
    #[error("worker id is required")]
    MissingWorker,
    #[error("worker {0} is already a member")]
    AlreadyMember(String),
    #[error("no member with entry id {0}")]
    MemberNotFound(EntryId),
    #[error("a collective must keep at least one member")]
    LastMember,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        collectives: Mutex<HashMap<CollectiveId, Collective>>,
    }

    impl CollectiveStore for MemoryStore {
        fn insert(&self, collective: Collective) -> Result<Collective, RepositoryError> {
            self.collectives
                .lock()
                .expect("store mutex poisoned")
                .insert(collective.id.clone(), collective.clone());
            Ok(collective)
        }

        fn update(&self, collective: Collective) -> Result<(), RepositoryError> {
            self.collectives
                .lock()
                .expect("store mutex poisoned")
                .insert(collective.id.clone(), collective);
            Ok(())
        }

        fn fetch(&self, id: &CollectiveId) -> Result<Option<Collective>, RepositoryError> {
            Ok(self
                .collectives
                .lock()
                .expect("store mutex poisoned")
                .get(id)
                .cloned())
        }
    }

    fn service() -> CollectiveService<MemoryStore> {
        CollectiveService::new(Arc::new(MemoryStore::default()))
    }

    fn founding() -> NewCollective {
        NewCollective {
            name: " East Side Painters ".to_string(),
            description: "Interior and exterior residential painting".to_string(),
            trade: "Painting".to_string(),
            founder_id: "worker-1".to_string(),
            founder_name: "Rosa Diaz".to_string(),
        }
    }

    fn member(worker_id: &str) -> CollectiveMember {
        CollectiveMember {
            worker_id: worker_id.to_string(),
            display_name: format!("Worker {worker_id}"),
            role: MemberRole::Founder,
        }
    }

    #[test]
    fn founder_is_first_member() {
        let collective = service().create(founding()).expect("creates");

        assert_eq!(collective.name, "East Side Painters");
        assert_eq!(collective.members.len(), 1);
        let founder = collective.members.items().next().expect("founder present");
        assert_eq!(founder.role, MemberRole::Founder);
    }

    #[test]
    fn blank_name_is_rejected() {
        let request = NewCollective {
            name: "   ".to_string(),
            ..founding()
        };
        assert!(matches!(
            service().create(request),
            Err(CollectiveServiceError::MissingName)
        ));
    }

    #[test]
    fn members_are_deduplicated_by_worker() {
        let service = service();
        let collective = service.create(founding()).expect("creates");

        let (updated, _) = service
            .add_member(&collective.id, member("worker-2"))
            .expect("adds");
        assert_eq!(updated.members.len(), 2);
        assert!(updated
            .members
            .items()
            .all(|m| m.worker_id != "worker-2" || m.role == MemberRole::Member));

        let renamed = CollectiveMember {
            display_name: "Someone else".to_string(),
            ..member("worker-2")
        };
        match service.add_member(&collective.id, renamed) {
            Err(CollectiveServiceError::AlreadyMember(worker)) => assert_eq!(worker, "worker-2"),
            other => panic!("expected duplicate rejection, got {other:?}"),
        }
        assert_eq!(service.get(&collective.id).expect("fetch").members.len(), 2);
    }

    #[test]
    fn last_member_cannot_leave() {
        let service = service();
        let collective = service.create(founding()).expect("creates");
        let founder_entry = collective.members.entries()[0].id;

        assert!(matches!(
            service.remove_member(&collective.id, founder_entry),
            Err(CollectiveServiceError::LastMember)
        ));

        let (_, entry) = service
            .add_member(&collective.id, member("worker-3"))
            .expect("adds");
        let updated = service
            .remove_member(&collective.id, entry)
            .expect("removes");
        assert_eq!(updated.members.len(), 1);
    }

    #[test]
    fn unknown_entries_and_collectives_are_reported() {
        let service = service();
        let collective = service.create(founding()).expect("creates");

        assert!(matches!(
            service.remove_member(&collective.id, EntryId::generate()),
            Err(CollectiveServiceError::MemberNotFound(_))
        ));
        assert!(matches!(
            service.get(&CollectiveId("col-missing".to_string())),
            Err(CollectiveServiceError::Repository(RepositoryError::NotFound))
        ));
    }
}
