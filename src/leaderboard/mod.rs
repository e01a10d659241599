//! Global Top-10 leaderboard.

pub mod client;
pub mod error;
pub mod firestore;
pub mod store;
pub mod worker;

pub use client::{normalize_name, qualify, LeaderboardClient, Qualification, SubmitOutcome};
pub use error::LeaderboardError;
pub use firestore::FirestoreStore;
pub use store::{MemoryStore, ScoreRecord, ScoreStore};
pub use worker::{handle_request, LeaderboardReply, LeaderboardRequest, LeaderboardWorker};

use crate::core::config::GameConfig;

/// Build a client for `config`: Firestore when credentials are set and
/// `offline` is false, otherwise an in-memory board.
pub fn client_from_config(config: &GameConfig, offline: bool) -> LeaderboardClient {
    match (&config.firestore, offline) {
        (Some(fs), false) => {
            log::info!("using Firestore leaderboard for project {}", fs.project_id);
            LeaderboardClient::new(FirestoreStore::new(fs.clone()))
        }
        _ => {
            log::info!("using in-memory leaderboard");
            LeaderboardClient::new(MemoryStore::new())
        }
    }
}
