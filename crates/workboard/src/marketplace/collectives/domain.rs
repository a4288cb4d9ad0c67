use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::sublist::{DedupKey, KeyedList};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectiveId(pub String);

impl std::fmt::Display for CollectiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Founder,
    #[default]
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectiveMember {
    pub worker_id: String,
    pub display_name: String,
    #[serde(default)]
    pub role: MemberRole,
}

/// One roster slot per worker, whatever name or role they were added under.
impl DedupKey for CollectiveMember {
    fn dedup_key(&self) -> String {
        self.worker_id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collective {
    pub id: CollectiveId,
    pub name: String,
    pub description: String,
    pub trade: String,
    pub members: KeyedList<CollectiveMember>,
    pub created_at: DateTime<Utc>,
}

impl Collective {
    pub fn has_member(&self, worker_id: &str) -> bool {
        self.members.contains_key(worker_id)
    }
}
