use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;
use workboard::marketplace::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository, JobApplicationService,
};
use workboard::marketplace::collectives::{
    Collective, CollectiveId, CollectiveService, CollectiveStore,
};
use workboard::marketplace::listing::{Catalog, WorkerProfile};
use workboard::marketplace::messaging::{
    Conversation, ConversationId, ConversationStore, MessagingService,
};
use workboard::marketplace::posting::{
    JobPost, JobPostId, JobPostService, JobPostStatus, JobPostStore, PostingRules,
};
use workboard::marketplace::profiles::{ProfileService, ProfileStore};
use workboard::marketplace::store::{Notification, Notifier, NotifyError, RepositoryError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Services wired to the in-memory adapters below.
#[derive(Clone)]
pub(crate) struct Marketplace {
    pub(crate) job_posts: Arc<JobPostService<InMemoryJobPostStore>>,
    pub(crate) applications:
        Arc<JobApplicationService<InMemoryApplicationRepository, LoggingNotifier>>,
    pub(crate) profiles: Arc<ProfileService<InMemoryProfileStore>>,
    pub(crate) collectives: Arc<CollectiveService<InMemoryCollectiveStore>>,
    pub(crate) messaging: Arc<MessagingService<InMemoryConversationStore, LoggingNotifier>>,
    pub(crate) catalog: Arc<Catalog>,
}

impl Marketplace {
    pub(crate) fn in_memory(catalog: Catalog, rules: PostingRules) -> Self {
        let notifier = Arc::new(LoggingNotifier::default());
        Self {
            job_posts: Arc::new(JobPostService::new(
                Arc::new(InMemoryJobPostStore::default()),
                rules,
            )),
            applications: Arc::new(JobApplicationService::new(
                Arc::new(InMemoryApplicationRepository::default()),
                notifier.clone(),
            )),
            profiles: Arc::new(ProfileService::new(Arc::new(
                InMemoryProfileStore::default(),
            ))),
            collectives: Arc::new(CollectiveService::new(Arc::new(
                InMemoryCollectiveStore::default(),
            ))),
            messaging: Arc::new(MessagingService::new(
                Arc::new(InMemoryConversationStore::default()),
                notifier,
            )),
            catalog: Arc::new(catalog),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobPostStore {
    posts: Arc<Mutex<HashMap<JobPostId, JobPost>>>,
}

impl JobPostStore for InMemoryJobPostStore {
    fn insert(&self, post: JobPost) -> Result<JobPost, RepositoryError> {
        let mut guard = self.posts.lock().expect("job post mutex poisoned");
        if guard.contains_key(&post.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    fn update(&self, post: JobPost) -> Result<(), RepositoryError> {
        let mut guard = self.posts.lock().expect("job post mutex poisoned");
        if guard.contains_key(&post.id) {
            guard.insert(post.id.clone(), post);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &JobPostId) -> Result<Option<JobPost>, RepositoryError> {
        let guard = self.posts.lock().expect("job post mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, status: JobPostStatus) -> Result<Vec<JobPost>, RepositoryError> {
        let guard = self.posts.lock().expect("job post mutex poisoned");
        Ok(guard
            .values()
            .filter(|post| post.status == status)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_job(&self, job_id: &str) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.application.job_id == job_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    profiles: Arc<Mutex<HashMap<String, WorkerProfile>>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn upsert(&self, profile: WorkerProfile) -> Result<WorkerProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, worker_id: &str) -> Result<Option<WorkerProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(worker_id).cloned())
    }

    fn list(&self) -> Result<Vec<WorkerProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCollectiveStore {
    collectives: Arc<Mutex<HashMap<CollectiveId, Collective>>>,
}

impl CollectiveStore for InMemoryCollectiveStore {
    fn insert(&self, collective: Collective) -> Result<Collective, RepositoryError> {
        let mut guard = self.collectives.lock().expect("collective mutex poisoned");
        if guard.contains_key(&collective.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(collective.id.clone(), collective.clone());
        Ok(collective)
    }

    fn update(&self, collective: Collective) -> Result<(), RepositoryError> {
        let mut guard = self.collectives.lock().expect("collective mutex poisoned");
        if guard.contains_key(&collective.id) {
            guard.insert(collective.id.clone(), collective);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &CollectiveId) -> Result<Option<Collective>, RepositoryError> {
        let guard = self.collectives.lock().expect("collective mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConversationStore {
    conversations: Arc<Mutex<HashMap<ConversationId, Conversation>>>,
}

impl ConversationStore for InMemoryConversationStore {
    fn insert(&self, conversation: Conversation) -> Result<Conversation, RepositoryError> {
        let mut guard = self.conversations.lock().expect("conversation mutex poisoned");
        if guard.contains_key(&conversation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(conversation.id.clone(), conversation.clone());
        Ok(conversation)
    }

    fn update(&self, conversation: Conversation) -> Result<(), RepositoryError> {
        let mut guard = self.conversations.lock().expect("conversation mutex poisoned");
        if guard.contains_key(&conversation.id) {
            guard.insert(conversation.id.clone(), conversation);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ConversationId) -> Result<Option<Conversation>, RepositoryError> {
        let guard = self.conversations.lock().expect("conversation mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_participant(&self, user_id: &str) -> Result<Vec<Conversation>, RepositoryError> {
        let guard = self.conversations.lock().expect("conversation mutex poisoned");
        Ok(guard
            .values()
            .filter(|conversation| conversation.is_participant(user_id))
            .cloned()
            .collect())
    }
}

/// Notifier that records every notification and logs it in place of a mail/push transport.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier for LoggingNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            template = %notification.template,
            recipient = %notification.recipient,
            "notification queued"
        );
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl LoggingNotifier {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}
