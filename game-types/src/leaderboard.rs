use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub player_name: String,
    pub email: Option<String>,
    pub total_score: i32,
    pub created_at: String, // ISO 8601 string
}

/// Opt-in submission after a qualifying final score.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardSubmission {
    pub player_name: String,
    pub email: Option<String>,
    pub total_score: i32,
}

/// Outcome of the top-20 gate, computed against the pre-insertion snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardDecision {
    /// Fewer than the board size, or the final score beats the lowest entry.
    Qualified,
    NotQualified,
}
