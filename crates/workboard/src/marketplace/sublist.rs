//! Append-only keyed lists used by the reference, skill, language and member editors.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Freshly generated identifier handed out for every accepted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}

/// Identity used for duplicate suppression. Comparison is exact and case-sensitive.
pub trait DedupKey {
    fn dedup_key(&self) -> String;
}

impl DedupKey for String {
    fn dedup_key(&self) -> String {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedEntry<T> {
    pub id: EntryId,
    pub item: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyedList<T> {
    entries: Vec<KeyedEntry<T>>,
}

/// Incoming entries go through the same duplicate suppression as `add`: a repeated id or
/// dedup key keeps only the first occurrence.
impl<'de, T> Deserialize<'de> for KeyedList<T>
where
    T: DedupKey + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<KeyedEntry<T>>::deserialize(deserializer)?;
        let mut list = Self::default();
        for entry in raw {
            list.restore(entry);
        }
        Ok(list)
    }
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: DedupKey> KeyedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless an entry with the same key exists. Returns the new id on insert.
    pub fn add(&mut self, item: T) -> Option<EntryId> {
        let key = item.dedup_key();
        if self.contains_key(&key) {
            return None;
        }

        let id = EntryId::generate();
        self.entries.push(KeyedEntry { id, item });
        Some(id)
    }

    fn restore(&mut self, entry: KeyedEntry<T>) -> bool {
        let key = entry.item.dedup_key();
        if self.entries.iter().any(|existing| existing.id == entry.id) || self.contains_key(&key) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(position).item)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.item.dedup_key() == key)
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.item)
    }

    pub fn entries(&self) -> &[KeyedEntry<T>] {
        &self.entries
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Push `value` onto a plain string array unless the exact string is already present.
pub fn push_unique(values: &mut Vec<String>, value: impl Into<String>) -> bool {
    let value = value.into();
    if value.is_empty() || values.iter().any(|existing| *existing == value) {
        return false;
    }
    values.push(value);
    true
}

/// Rebuild a string array with `push_unique` semantics, keeping first occurrences in order.
pub fn dedup_values(values: &[String]) -> Vec<String> {
    let mut unique = Vec::with_capacity(values.len());
    for value in values {
        push_unique(&mut unique, value.as_str());
    }
    unique
}

pub fn remove_value(values: &mut Vec<String>, value: &str) -> bool {
    let before = values.len();
    values.retain(|existing| existing != value);
    values.len() != before
}
