//! Grouping of tracks by [`DedupeKey`].
//!
//! Keys keep the order in which they were first seen, and tracks keep their
//! arrival order within a key, so feeding records in playlist order makes
//! every report deterministic.

use crate::types::{DedupeKey, TrackRecord};
use std::collections::HashMap;

/// All tracks sharing one key, in arrival order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackGroup {
    key: DedupeKey,
    tracks: Vec<TrackRecord>,
}

impl TrackGroup {
    pub fn key(&self) -> &DedupeKey {
        &self.key
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn is_duplicate(&self) -> bool {
        self.tracks.len() > 1
    }
}

/// Insertion-ordered map from key to track group
#[derive(Debug, Default)]
pub struct GroupTable {
    index: HashMap<DedupeKey, usize>,
    groups: Vec<TrackGroup>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: TrackRecord) {
        let key = record.key();
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].tracks.push(record),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(TrackGroup {
                    key,
                    tracks: vec![record],
                });
            }
        }
    }

    pub fn get(&self, key: &DedupeKey) -> Option<&TrackGroup> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn track_count(&self) -> usize {
        self.groups.iter().map(|g| g.tracks.len()).sum()
    }

    /// Every group in first-seen order
    pub fn groups(&self) -> &[TrackGroup] {
        &self.groups
    }

    /// Groups holding more than one track, in first-seen order
    pub fn duplicates(&self) -> Vec<&TrackGroup> {
        self.groups.iter().filter(|g| g.is_duplicate()).collect()
    }

    /// Groups holding exactly one track
    pub fn unique(&self) -> Vec<&TrackGroup> {
        self.groups.iter().filter(|g| !g.is_duplicate()).collect()
    }
}

impl Extend<TrackRecord> for GroupTable {
    fn extend<I: IntoIterator<Item = TrackRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<TrackRecord> for GroupTable {
    fn from_iter<I: IntoIterator<Item = TrackRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
