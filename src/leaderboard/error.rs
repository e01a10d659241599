use thiserror::Error;

/// Failures surfaced by the leaderboard client.
///
/// None of these ever reach the run loop as a panic; the session turns them
/// into a status line on the game-over panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaderboardError {
    #[error("{0}")]
    Validation(String),
    #[error("Wait a moment before submitting again")]
    RateLimit,
    #[error("Score already submitted for this run")]
    DuplicateSubmission,
    #[error("Leaderboard unavailable: {0}")]
    Unavailable(String),
}

impl LeaderboardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
