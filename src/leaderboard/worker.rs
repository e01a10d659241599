//! Background thread that owns the leaderboard client.
//!
//! The frame loop sends requests and polls replies without blocking. Every
//! request carries the run id it was made for and the reply echoes it, so the
//! session can drop replies that arrive after a restart.

use super::client::{LeaderboardClient, Qualification, SubmitOutcome};
use super::error::LeaderboardError;
use super::store::ScoreRecord;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardRequest {
    FetchTop {
        run_id: u64,
        limit: usize,
    },
    Qualify {
        run_id: u64,
        score: u64,
    },
    Submit {
        run_id: u64,
        name: String,
        score: u64,
        now_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardReply {
    Top {
        run_id: u64,
        entries: Vec<ScoreRecord>,
    },
    Qualification {
        run_id: u64,
        score: u64,
        result: Qualification,
    },
    Submitted {
        run_id: u64,
        result: Result<SubmitOutcome, LeaderboardError>,
        /// Cooldown start after this request, for persisting.
        last_submit_ms: Option<u64>,
    },
}

impl LeaderboardReply {
    pub fn run_id(&self) -> u64 {
        match self {
            Self::Top { run_id, .. }
            | Self::Qualification { run_id, .. }
            | Self::Submitted { run_id, .. } => *run_id,
        }
    }
}

/// Run one request against the client. Also used directly by the simulator.
pub fn handle_request(
    client: &mut LeaderboardClient,
    request: LeaderboardRequest,
) -> LeaderboardReply {
    match request {
        LeaderboardRequest::FetchTop { run_id, limit } => LeaderboardReply::Top {
            run_id,
            entries: client.fetch_top(limit),
        },
        LeaderboardRequest::Qualify { run_id, score } => LeaderboardReply::Qualification {
            run_id,
            score,
            result: client.qualifies(score),
        },
        LeaderboardRequest::Submit {
            run_id,
            name,
            score,
            now_ms,
        } => {
            let result = client.submit(&name, score as f64, run_id, now_ms);
            LeaderboardReply::Submitted {
                run_id,
                result,
                last_submit_ms: client.last_submit_ms(),
            }
        }
    }
}

pub struct LeaderboardWorker {
    requests: Option<Sender<LeaderboardRequest>>,
    replies: Receiver<LeaderboardReply>,
    handle: Option<JoinHandle<()>>,
}

impl LeaderboardWorker {
    /// Move `client` onto a new thread.
    pub fn spawn(mut client: LeaderboardClient) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LeaderboardRequest>();
        let (reply_tx, reply_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            // Ends when the sender side is dropped.
            for request in request_rx {
                let reply = handle_request(&mut client, request);
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            log::debug!("leaderboard worker stopped");
        });

        Self {
            requests: Some(request_tx),
            replies: reply_rx,
            handle: Some(handle),
        }
    }

    /// Queue a request. Returns false if the worker has gone away.
    pub fn send(&self, request: LeaderboardRequest) -> bool {
        match &self.requests {
            Some(tx) => tx.send(request).is_ok(),
            None => false,
        }
    }

    /// Next finished reply, if any. Never blocks.
    pub fn try_recv(&self) -> Option<LeaderboardReply> {
        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next reply. Used by tests and the simulator.
    pub fn recv(&self) -> Option<LeaderboardReply> {
        self.replies.recv().ok()
    }
}

impl Drop for LeaderboardWorker {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            // A request stuck on the network is not worth waiting for.
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}
