use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type MatchId = Uuid;
pub type SessionId = Uuid;
pub type WordId = Uuid;

/// A word fetched for a round. Immutable once the round is open; the text
/// and clue are only ever disclosed to the agent, never in UI snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub category: Option<String>,
    pub clue: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MatchPhase {
    Idle,                // No match; waiting for the user to start
    InProgress,          // Rounds being played
    AwaitingLeaderboard, // Final round done, top-20 check pending or prompt shown
    LeaderboardShown,    // Leaderboard displayed, match effectively over
}

/// Safe view of the match state for UI rendering and HTTP responses.
/// Never exposes the target word or clue.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchSnapshot {
    pub match_id: Option<MatchId>,
    pub phase: MatchPhase,
    pub round_number: u32,
    pub round_status: RoundStatus,
    pub round_score: i32,
    pub total_score: i32,
    pub word_length: Option<u32>,
    pub category: Option<String>,
    pub guessed_words: Vec<String>,
    pub guesses_left: u32,
}

/// Result of applying one guess to the state machine. Carries everything the
/// tool adapter needs to render a natural-language reply and persist the
/// round outcome without reading the engine again.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    NoMatch,
    WordPending,
    RoundOver {
        word: String,
    },
    EmptyGuess,
    Duplicate {
        word: String,
    },
    Incorrect {
        word: String,
        guesses_left: u32,
    },
    Correct {
        word: String,
        guess_count: u32,
        round_score: i32,
        total_score: i32,
        final_round: bool,
    },
    RoundLost {
        word: String,
        attempts: u32,
        total_score: i32,
        final_round: bool,
    },
}

/// Pure precondition check for advancing to the next round.
#[derive(Debug, Clone, PartialEq)]
pub enum NextRoundGate {
    NoMatch,
    RoundStillActive,
    MatchComplete { total_score: i32 },
    Ready { next_round: u32 },
}
