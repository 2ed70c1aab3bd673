use std::collections::HashSet;
use std::sync::Arc;

use pulse_types::{FeedbackFilter, FeedbackRecord, Rating};
use tracing::debug;
use uuid::Uuid;

use crate::clock::{Clock, DefaultClock};
use crate::error::{Result, StoreError};

/// The session's authoritative, newest-first list of feedback.
///
/// Authorization is the caller's job: the store applies whatever it is asked
/// to, provided the input itself is valid.
pub struct RecordStore {
    records: Vec<FeedbackRecord>,
    clock: Arc<dyn Clock>,
    // Ids created or edited, and ids removed, since this store was built.
    touched: HashSet<String>,
    removed: HashSet<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            clock,
            touched: HashSet::new(),
            removed: HashSet::new(),
        }
    }

    /// Create a record and place it ahead of every existing one.
    pub fn submit(
        &mut self,
        movie_id: &str,
        user_id: &str,
        user_name: &str,
        rating: i64,
        text: &str,
    ) -> Result<FeedbackRecord> {
        let rating = Rating::new(rating)?;
        let record = FeedbackRecord::new(
            Uuid::new_v4().to_string(),
            movie_id,
            user_id,
            user_name,
            rating,
            text,
            self.clock.utc(),
        );
        self.records.insert(0, record.clone());
        self.touched.insert(record.id.clone());
        debug!(id = %record.id, movie_id, sentiment = %record.sentiment(), "feedback submitted");
        Ok(record)
    }

    /// Replace rating and text in place. Fails with `NotFound` for unknown ids.
    pub fn edit(&mut self, record_id: &str, rating: i64, text: &str) -> Result<FeedbackRecord> {
        let rating = Rating::new(rating)?;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| StoreError::NotFound {
                id: record_id.to_string(),
            })?;
        record.revise(rating, text);
        self.touched.insert(record_id.to_string());
        debug!(id = record_id, sentiment = %record.sentiment(), "feedback edited");
        Ok(record.clone())
    }

    /// Remove by id. Returns whether anything was removed; unknown ids are a no-op.
    pub fn remove(&mut self, record_id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != record_id);
        let removed = self.records.len() != before;
        if removed {
            self.removed.insert(record_id.to_string());
            debug!(id = record_id, "feedback removed");
        }
        removed
    }

    pub fn list(&self, filter: Option<&FeedbackFilter>) -> Vec<FeedbackRecord> {
        match filter {
            Some(filter) => self
                .records
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect(),
            None => self.records.clone(),
        }
    }

    pub fn get(&self, record_id: &str) -> Option<&FeedbackRecord> {
        self.records.iter().find(|r| r.id == record_id)
    }

    /// Borrowed view for the derivation functions.
    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    /// Swap in a full listing (startup restore or remote pull), newest first.
    pub fn replace_all(&mut self, mut records: Vec<FeedbackRecord>) {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.records = records;
    }

    /// Fold a remote listing into the local one without undoing local work.
    ///
    /// Records created or edited here keep their local version, records
    /// removed here stay removed, and local records the remote does not know
    /// are kept. Everything else takes the remote version. Returns how many
    /// records were new to this store.
    pub fn merge_remote(&mut self, remote: Vec<FeedbackRecord>) -> usize {
        let mut merged = std::mem::take(&mut self.records);
        let mut added = 0;
        for incoming in remote {
            if self.removed.contains(&incoming.id) {
                continue;
            }
            match merged.iter_mut().find(|r| r.id == incoming.id) {
                Some(local) => {
                    if !self.touched.contains(&incoming.id) {
                        *local = incoming;
                    }
                }
                None => {
                    merged.push(incoming);
                    added += 1;
                }
            }
        }
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.records = merged;
        debug!(added, total = self.records.len(), "remote listing merged");
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
