//! The score store seam and an in-memory implementation.

use super::error::LeaderboardError;
use chrono::{DateTime, Utc};

/// One leaderboard entry as held by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Store-assigned document id.
    pub id: String,
    pub name: String,
    pub score: u64,
    pub created_at: Option<DateTime<Utc>>,
}

/// A remote key-sorted score collection.
///
/// Implementations hold at most one record per name; the client keeps that
/// true by updating in place.
pub trait ScoreStore: Send {
    /// Up to `limit` records, highest score first.
    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, LeaderboardError>;

    fn find_by_name(&self, name: &str) -> Result<Option<ScoreRecord>, LeaderboardError>;

    fn insert(
        &mut self,
        name: &str,
        score: u64,
        at: DateTime<Utc>,
    ) -> Result<ScoreRecord, LeaderboardError>;

    fn update(
        &mut self,
        id: &str,
        name: &str,
        score: u64,
        at: DateTime<Utc>,
    ) -> Result<(), LeaderboardError>;
}

/// Process-local store used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with `(name, score)` pairs.
    pub fn with_scores<'a>(scores: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let mut store = Self::new();
        for (name, score) in scores {
            store.push(name, score, None);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(&mut self, name: &str, score: u64, at: Option<DateTime<Utc>>) -> ScoreRecord {
        let record = ScoreRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            score,
            created_at: at,
        };
        self.records.push(record.clone());
        record
    }
}

impl ScoreStore for MemoryStore {
    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        let mut sorted = self.records.clone();
        // Stable sort keeps insertion order between equal scores.
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(limit);
        Ok(sorted)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<ScoreRecord>, LeaderboardError> {
        Ok(self.records.iter().find(|r| r.name == name).cloned())
    }

    fn insert(
        &mut self,
        name: &str,
        score: u64,
        at: DateTime<Utc>,
    ) -> Result<ScoreRecord, LeaderboardError> {
        Ok(self.push(name, score, Some(at)))
    }

    fn update(
        &mut self,
        id: &str,
        name: &str,
        score: u64,
        at: DateTime<Utc>,
    ) -> Result<(), LeaderboardError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LeaderboardError::unavailable(format!("no record {}", id)))?;
        record.name = name.to_string();
        record.score = score;
        record.created_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_is_sorted_and_limited() {
        let store = MemoryStore::with_scores([("a", 100), ("b", 900), ("c", 500), ("d", 700)]);
        let top = store.top(3).unwrap();
        let scores: Vec<u64> = top.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![900, 700, 500]);
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let mut store = MemoryStore::new();
        let a = store.insert("Ann", 600, Utc::now()).unwrap();
        let b = store.insert("Bob", 700, Utc::now()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_in_place() {
        let mut store = MemoryStore::new();
        let rec = store.insert("Ann", 600, Utc::now()).unwrap();
        store.update(&rec.id, "Ann", 800, Utc::now()).unwrap();
        let found = store.find_by_name("Ann").unwrap().unwrap();
        assert_eq!(found.score, 800);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_missing_record_fails() {
        let mut store = MemoryStore::new();
        let err = store.update("nope", "Ann", 1, Utc::now()).unwrap_err();
        assert!(matches!(err, LeaderboardError::Unavailable(_)));
    }
}
