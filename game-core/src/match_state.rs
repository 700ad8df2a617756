use game_types::{
    GuessOutcome, MatchId, MatchPhase, MatchSnapshot, NextRoundGate, RoundStatus, SessionId, Word,
};
use tracing::debug;
use uuid::Uuid;

use crate::scoring::round_score;

pub const MAX_ROUNDS: u32 = 3;
pub const MAX_GUESSES_PER_ROUND: u32 = 10;

/// Word used when the backend cannot supply one; keeps the round playable.
pub fn fallback_word() -> Word {
    Word {
        id: Uuid::nil(),
        text: "lovable".to_string(),
        category: Some("Adjective".to_string()),
        clue: Some("Easy to adore".to_string()),
    }
}

/// One word-guessing episode within a match. The word is fixed for the life
/// of the round; `guessed_words` holds normalized guesses in order.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub word: Word,
    pub session_id: Option<SessionId>,
    pub guessed_words: Vec<String>,
    pub status: RoundStatus,
    pub round_score: i32,
}

impl RoundState {
    fn new(word: Word, session_id: Option<SessionId>) -> Self {
        Self {
            word,
            session_id,
            guessed_words: Vec::new(),
            status: RoundStatus::Playing,
            round_score: 0,
        }
    }

    fn target(&self) -> String {
        self.word.text.trim().to_lowercase()
    }

    fn is_over(&self) -> bool {
        self.status != RoundStatus::Playing
    }
}

/// The match/round state machine. All mutation goes through the operations
/// below; callers hold the engine behind a single lock so each guess is an
/// atomic read-modify-write against current state.
#[derive(Debug)]
pub struct MatchEngine {
    match_id: Option<MatchId>,
    phase: MatchPhase,
    round_number: u32,
    total_score: i32,
    round: Option<RoundState>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            match_id: None,
            phase: MatchPhase::Idle,
            round_number: 1,
            total_score: 0,
            round: None,
        }
    }

    pub fn match_id(&self) -> Option<MatchId> {
        self.match_id
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn total_score(&self) -> i32 {
        self.total_score
    }

    /// The word currently in play. Disclosed to the agent only.
    pub fn current_word(&self) -> Option<&Word> {
        self.round.as_ref().map(|r| &r.word)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.round.as_ref().and_then(|r| r.session_id)
    }

    /// Clear everything, including match identity and leaderboard-flow phase.
    /// Idempotent; safe to call on disconnect regardless of current state.
    pub fn reset_match(&mut self) {
        self.match_id = None;
        self.phase = MatchPhase::Idle;
        self.round_number = 1;
        self.total_score = 0;
        self.round = None;
    }

    /// Clear round-local state only; match identity and total score survive.
    pub fn reset_round(&mut self) {
        self.round = None;
    }

    /// Open round 1 of a fresh match. The caller supplies the match id and
    /// any already-created session so the engine never holds a match id
    /// without an open round.
    pub fn start_match(&mut self, match_id: MatchId, word: Word, session_id: Option<SessionId>) {
        self.reset_match();
        debug!(%match_id, word = %word.text, "starting new match");
        self.match_id = Some(match_id);
        self.phase = MatchPhase::InProgress;
        self.round_number = 1;
        self.round = Some(RoundState::new(word, session_id));
    }

    /// Check whether advancing is possible without mutating anything.
    /// The round cap is checked before round status: asking to advance out
    /// of the final round ends the match even while it is still in play.
    pub fn next_round_gate(&self) -> NextRoundGate {
        if self.match_id.is_none() {
            return NextRoundGate::NoMatch;
        }
        if self.round_number >= MAX_ROUNDS {
            return NextRoundGate::MatchComplete {
                total_score: self.total_score,
            };
        }
        if let Some(round) = &self.round {
            if !round.is_over() {
                return NextRoundGate::RoundStillActive;
            }
        }
        NextRoundGate::Ready {
            next_round: self.round_number + 1,
        }
    }

    /// Advance into the next round with a freshly fetched word. Returns the
    /// new round number, or None when the gate is not `Ready` (a match at
    /// MAX_ROUNDS never grows a further round).
    pub fn start_next_round(&mut self, word: Word, session_id: Option<SessionId>) -> Option<u32> {
        match self.next_round_gate() {
            NextRoundGate::Ready { next_round } => {
                debug!(round = next_round, word = %word.text, "starting next round");
                self.round_number = next_round;
                self.round = Some(RoundState::new(word, session_id));
                Some(next_round)
            }
            _ => None,
        }
    }

    /// Apply one guess. Normalizes input, rejects empty/duplicate/finished
    /// cases without mutating, and performs win/lose transitions with score
    /// accounting otherwise.
    pub fn submit_guess(&mut self, raw: &str) -> GuessOutcome {
        if self.match_id.is_none() {
            return GuessOutcome::NoMatch;
        }
        let Some(round) = self.round.as_mut() else {
            return GuessOutcome::WordPending;
        };
        if round.is_over() {
            return GuessOutcome::RoundOver {
                word: round.target(),
            };
        }

        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return GuessOutcome::EmptyGuess;
        }
        if round.guessed_words.contains(&normalized) {
            return GuessOutcome::Duplicate { word: normalized };
        }

        round.guessed_words.push(normalized.clone());
        let guess_count = round.guessed_words.len() as u32;
        let final_round = self.round_number >= MAX_ROUNDS;

        if normalized == round.target() {
            let score = round_score(guess_count);
            round.status = RoundStatus::Won;
            round.round_score = score;
            self.total_score += score;
            GuessOutcome::Correct {
                word: normalized,
                guess_count,
                round_score: score,
                total_score: self.total_score,
                final_round,
            }
        } else if guess_count >= MAX_GUESSES_PER_ROUND {
            round.status = RoundStatus::Lost;
            GuessOutcome::RoundLost {
                word: round.target(),
                attempts: guess_count,
                total_score: self.total_score,
                final_round,
            }
        } else {
            GuessOutcome::Incorrect {
                word: normalized,
                guesses_left: MAX_GUESSES_PER_ROUND - guess_count,
            }
        }
    }

    /// Enter the leaderboard flow once the final round has ended.
    pub fn begin_leaderboard_check(&mut self) {
        if self.match_id.is_some() {
            self.phase = MatchPhase::AwaitingLeaderboard;
        }
    }

    /// Leave the leaderboard flow; the board has been shown either way.
    pub fn resolve_leaderboard(&mut self) {
        if self.phase == MatchPhase::AwaitingLeaderboard {
            self.phase = MatchPhase::LeaderboardShown;
        }
    }

    /// Safe state for UI rendering; never advances state and never exposes
    /// the target word or clue.
    pub fn snapshot(&self) -> MatchSnapshot {
        let round = self.round.as_ref();
        let guessed_words = round.map(|r| r.guessed_words.clone()).unwrap_or_default();
        let guesses_left = MAX_GUESSES_PER_ROUND.saturating_sub(guessed_words.len() as u32);

        MatchSnapshot {
            match_id: self.match_id,
            phase: self.phase,
            round_number: self.round_number,
            round_status: round.map(|r| r.status).unwrap_or(RoundStatus::Playing),
            round_score: round.map(|r| r.round_score).unwrap_or(0),
            total_score: self.total_score,
            word_length: round.map(|r| r.target().chars().count() as u32),
            category: round.and_then(|r| r.word.category.clone()),
            guessed_words,
            guesses_left,
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
