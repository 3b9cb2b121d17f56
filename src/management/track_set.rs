use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::TrackId;

/// A deduplicated set of track identifiers.
///
/// Built fresh for every run, either from a decoded blob or from the live
/// library, and combined only through [`union`](TrackSet::union) and
/// [`difference`](TrackSet::difference), which return new sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSet {
    ids: HashSet<TrackId>,
}

/// Empty object written as the value of every id in the wire record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Marker {}

/// Wire shape: `{ "ids": { "<id>": {}, ... } }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackSetRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    ids: BTreeMap<TrackId, Marker>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<TrackId, Marker>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = TrackId>,
    {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Adds `id`, returning whether it was new.
    pub fn insert(&mut self, id: TrackId) -> bool {
        self.ids.insert(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackId> {
        self.ids.iter()
    }

    /// The ids in arbitrary order.
    pub fn to_vec(&self) -> Vec<TrackId> {
        self.ids.iter().cloned().collect()
    }

    pub fn union(&self, other: &TrackSet) -> TrackSet {
        Self {
            ids: self.ids.union(&other.ids).cloned().collect(),
        }
    }

    /// Ids of `self` that are not in `other`.
    pub fn difference(&self, other: &TrackSet) -> TrackSet {
        Self {
            ids: self.ids.difference(&other.ids).cloned().collect(),
        }
    }

    /// Encodes the set as its wire record. Keys are sorted, so equal sets
    /// always encode to the same bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let record = TrackSetRecord {
            ids: self
                .ids
                .iter()
                .map(|id| (id.clone(), Marker {}))
                .collect(),
        };
        serde_json::to_vec(&record)
    }

    /// Decodes a wire record. Empty input, `null`, `{}` and `{"ids": null}`
    /// all decode to an empty set.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        let record: Option<TrackSetRecord> = serde_json::from_slice(bytes)?;
        Ok(Self::from_ids(
            record.unwrap_or_default().ids.into_keys(),
        ))
    }
}

impl FromIterator<TrackId> for TrackSet {
    fn from_iter<T: IntoIterator<Item = TrackId>>(iter: T) -> Self {
        Self::from_ids(iter)
    }
}

impl<'a> IntoIterator for &'a TrackSet {
    type Item = &'a TrackId;
    type IntoIter = std::collections::hash_set::Iter<'a, TrackId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
