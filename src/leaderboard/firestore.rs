//! Firestore REST store.
//!
//! Talks to the public `documents` endpoints with an API key; no SDK. The
//! request bodies and response decoding are plain functions over
//! `serde_json::Value` so they can be tested without a network.

use super::error::LeaderboardError;
use super::store::{ScoreRecord, ScoreStore};
use crate::core::config::FirestoreConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::time::Duration;

const API_ROOT: &str = "https://firestore.googleapis.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 8;
const USER_AGENT: &str = "onebutton-leaderboard";
/// Fields a PATCH rewrites; anything else on the document is kept.
const UPDATE_MASK: &str =
    "updateMask.fieldPaths=name&updateMask.fieldPaths=score&updateMask.fieldPaths=createdAt";

pub struct FirestoreStore {
    config: FirestoreConfig,
    agent: ureq::Agent,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();
        Self { config, agent }
    }

    fn documents_url(&self) -> String {
        documents_url(&self.config.project_id)
    }

    fn run_query(&self, body: &Value) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        let url = format!("{}:runQuery?key={}", self.documents_url(), self.config.api_key);
        let response: Value = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(convert_error)?
            .into_json()
            .map_err(|e| LeaderboardError::unavailable(format!("bad response: {}", e)))?;
        Ok(decode_query_response(&response))
    }
}

impl ScoreStore for FirestoreStore {
    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, LeaderboardError> {
        self.run_query(&top_query(&self.config.collection, limit))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<ScoreRecord>, LeaderboardError> {
        Ok(self
            .run_query(&name_query(&self.config.collection, name))?
            .into_iter()
            .next())
    }

    fn insert(
        &mut self,
        name: &str,
        score: u64,
        at: DateTime<Utc>,
    ) -> Result<ScoreRecord, LeaderboardError> {
        let url = format!(
            "{}/{}?key={}",
            self.documents_url(),
            self.config.collection,
            self.config.api_key
        );
        let response: Value = self
            .agent
            .post(&url)
            .send_json(score_document(name, score, at))
            .map_err(convert_error)?
            .into_json()
            .map_err(|e| LeaderboardError::unavailable(format!("bad response: {}", e)))?;
        decode_document(&response)
            .ok_or_else(|| LeaderboardError::unavailable("created document missing fields"))
    }

    fn update(
        &mut self,
        id: &str,
        name: &str,
        score: u64,
        at: DateTime<Utc>,
    ) -> Result<(), LeaderboardError> {
        // `id` is the full document resource name returned by a query.
        let url = format!("{}/{}?key={}&{}", API_ROOT, id, self.config.api_key, UPDATE_MASK);
        self.agent
            .request("PATCH", &url)
            .send_json(score_document(name, score, at))
            .map_err(convert_error)?;
        Ok(())
    }
}

fn convert_error(e: ureq::Error) -> LeaderboardError {
    match e {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            LeaderboardError::unavailable(format!("HTTP {}: {}", code, body.trim()))
        }
        other => LeaderboardError::unavailable(other.to_string()),
    }
}

pub fn documents_url(project_id: &str) -> String {
    format!(
        "{}/projects/{}/databases/(default)/documents",
        API_ROOT, project_id
    )
}

/// `runQuery` body for the top `limit` scores.
pub fn top_query(collection: &str, limit: usize) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "orderBy": [{ "field": { "fieldPath": "score" }, "direction": "DESCENDING" }],
            "limit": limit,
        }
    })
}

/// `runQuery` body for the single record with `name`.
pub fn name_query(collection: &str, name: &str) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "name" },
                    "op": "EQUAL",
                    "value": { "stringValue": name },
                }
            },
            "limit": 1,
        }
    })
}

/// Document body with typed Firestore values.
pub fn score_document(name: &str, score: u64, at: DateTime<Utc>) -> Value {
    json!({
        "fields": {
            "name": { "stringValue": name },
            // Firestore encodes 64-bit integers as strings.
            "score": { "integerValue": score.to_string() },
            "createdAt": { "timestampValue": at.to_rfc3339_opts(SecondsFormat::Millis, true) },
        }
    })
}

/// Extract records from a `runQuery` response array. Result rows without a
/// document (an empty result still carries a `readTime` row) are skipped.
pub fn decode_query_response(response: &Value) -> Vec<ScoreRecord> {
    response
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| row.get("document"))
                .filter_map(decode_document)
                .collect()
        })
        .unwrap_or_default()
}

pub fn decode_document(doc: &Value) -> Option<ScoreRecord> {
    let id = doc.get("name")?.as_str()?.to_string();
    let fields = doc.get("fields")?;
    let name = fields["name"]["stringValue"].as_str().unwrap_or("Player").to_string();
    let score = decode_score(&fields["score"]);
    let created_at = fields["createdAt"]["timestampValue"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));
    Some(ScoreRecord {
        id,
        name,
        score,
        created_at,
    })
}

/// Scores may have been written as integers or doubles; both floor to u64.
fn decode_score(value: &Value) -> u64 {
    if let Some(s) = value["integerValue"].as_str() {
        return s.parse::<i64>().map(|n| n.max(0) as u64).unwrap_or(0);
    }
    match value["doubleValue"].as_f64() {
        Some(d) if d.is_finite() && d > 0.0 => d.floor() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_documents_url() {
        assert_eq!(
            documents_url("demo"),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents"
        );
    }

    #[test]
    fn test_top_query_shape() {
        let q = top_query("scores", 10);
        let sq = &q["structuredQuery"];
        assert_eq!(sq["from"][0]["collectionId"], "scores");
        assert_eq!(sq["orderBy"][0]["field"]["fieldPath"], "score");
        assert_eq!(sq["orderBy"][0]["direction"], "DESCENDING");
        assert_eq!(sq["limit"], 10);
    }

    #[test]
    fn test_name_query_filters_on_name() {
        let q = name_query("scores", "Ann");
        let filter = &q["structuredQuery"]["where"]["fieldFilter"];
        assert_eq!(filter["op"], "EQUAL");
        assert_eq!(filter["value"]["stringValue"], "Ann");
        assert_eq!(q["structuredQuery"]["limit"], 1);
    }

    #[test]
    fn test_score_document_encoding() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = score_document("Ann", 600, at);
        assert_eq!(doc["fields"]["score"]["integerValue"], "600");
        assert_eq!(doc["fields"]["name"]["stringValue"], "Ann");
        assert_eq!(
            doc["fields"]["createdAt"]["timestampValue"],
            "2024-05-01T12:00:00.000Z"
        );
    }

    #[test]
    fn test_decode_query_response() {
        let response = json!([
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/scores/abc",
                    "fields": {
                        "name": { "stringValue": "Ann" },
                        "score": { "integerValue": "1200" },
                        "createdAt": { "timestampValue": "2024-05-01T12:00:00.000Z" }
                    }
                },
                "readTime": "2024-05-01T12:00:01Z"
            },
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/scores/def",
                    "fields": {
                        "name": { "stringValue": "Bob" },
                        "score": { "doubleValue": 640.7 }
                    }
                }
            }
        ]);
        let records = decode_query_response(&response);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Ann");
        assert_eq!(records[0].score, 1200);
        assert!(records[0].created_at.is_some());
        assert!(records[0].id.ends_with("/scores/abc"));
        assert_eq!(records[1].score, 640);
        assert!(records[1].created_at.is_none());
    }

    #[test]
    fn test_decode_empty_result() {
        let response = json!([{ "readTime": "2024-05-01T12:00:01Z" }]);
        assert!(decode_query_response(&response).is_empty());
        assert!(decode_query_response(&json!({})).is_empty());
    }
}
