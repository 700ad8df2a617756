use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use game_core::{fallback_word, leaderboard_decision, MatchEngine, LEADERBOARD_SIZE, MAX_ROUNDS};
use game_persistence::repositories::{
    LeaderboardRepository, SessionRepository, WordRepository,
};
use game_types::{
    ClientMessage, GuessOutcome, LeaderboardDecision, LeaderboardEntry, MatchPhase, NextRoundGate,
    RoundStatus, ServerMessage, SessionId, Word,
};

use crate::session::PlayerSession;

const CONSOLATION_MESSAGE: &str =
    "You didn't make the top 20 this time. Better luck next time!";

fn clue_text(word: &Word) -> &str {
    word.clue.as_deref().unwrap_or("none")
}

fn theme_text(word: &Word) -> &str {
    word.category.as_deref().unwrap_or("none")
}

fn target_text(word: &Word) -> String {
    word.text.trim().to_lowercase()
}

/// Translates relayed voice-agent tool calls into engine operations and
/// renders instructional replies for the agent. Every reply spells out what
/// the agent should say or do next; `[system: end_call]` tells it to hang up.
pub struct ToolHandler {
    words: Arc<WordRepository>,
    sessions: Arc<SessionRepository>,
    leaderboard: Arc<LeaderboardRepository>,
}

impl ToolHandler {
    pub fn new(
        words: Arc<WordRepository>,
        sessions: Arc<SessionRepository>,
        leaderboard: Arc<LeaderboardRepository>,
    ) -> Self {
        Self {
            words,
            sessions,
            leaderboard,
        }
    }

    pub async fn handle_message(
        &self,
        session: &PlayerSession,
        message: ClientMessage,
    ) -> Vec<ServerMessage> {
        match message {
            ClientMessage::SubmitGuess { word } => self.handle_submit_guess(session, &word).await,
            ClientMessage::GetGameStatus => vec![ServerMessage::ToolResult {
                text: self.render_game_status(session).await,
            }],
            ClientMessage::ResetGame => self.handle_reset_game(session).await,
            ClientMessage::StartNextRound => self.handle_start_next_round(session).await,
            ClientMessage::DeclineLeaderboard => self.handle_decline_leaderboard(session).await,
            ClientMessage::Heartbeat => Vec::new(),
        }
    }

    async fn handle_submit_guess(&self, session: &PlayerSession, raw: &str) -> Vec<ServerMessage> {
        let mut engine = session.engine.write().await;
        let outcome = engine.submit_guess(raw);

        let text = match &outcome {
            GuessOutcome::NoMatch | GuessOutcome::WordPending => {
                "I'm still thinking of a word. Please give me a moment.".to_string()
            }
            GuessOutcome::RoundOver { word } => format!(
                "The round is already over. The word was \"{}\". Ask the user if they are ready \
                 for the next round. If they give an affirmative answer, call the startNextRound \
                 tool.",
                word
            ),
            GuessOutcome::EmptyGuess => {
                "The user didn't say a clear word. Ask them to guess again.".to_string()
            }
            GuessOutcome::Duplicate { word } => format!(
                "The user already guessed the word {}. Tell them to guess another word.",
                word
            ),
            GuessOutcome::Incorrect { word, guesses_left } => format!(
                "The user's guess \"{}\" was INCORRECT. They have {} guesses left for this \
                 round. Encourage them to try again. Use the secret clue to give them a clever \
                 hint.",
                word, guesses_left
            ),
            GuessOutcome::Correct {
                word,
                round_score,
                total_score,
                final_round: false,
                ..
            } => format!(
                "The user's guess \"{}\" was CORRECT. They won the round and scored {} points. \
                 Their total score is now {}. Now, ask them if they are ready for the next \
                 round. If they give an affirmative answer, you MUST call the startNextRound \
                 tool.",
                word, round_score, total_score
            ),
            GuessOutcome::Correct {
                word,
                round_score,
                total_score,
                final_round: true,
                ..
            } => format!(
                "The user's guess \"{}\" was CORRECT. They won the final round, scoring {} \
                 points. This was the last round! Their final total score is {}. Thanks for \
                 playin', and have yourself a mighty fine day! [system: end_call]",
                word, round_score, total_score
            ),
            GuessOutcome::RoundLost {
                word,
                final_round: false,
                ..
            } => format!(
                "The user ran out of guesses. The round is over. The word was \"{}\". Tell them \
                 not to worry, and ask if they are ready for the next round. If they give an \
                 affirmative answer, you MUST call the startNextRound tool.",
                word
            ),
            GuessOutcome::RoundLost {
                word,
                total_score,
                final_round: true,
                ..
            } => format!(
                "The user ran out of guesses on the final round. The game is over. The word was \
                 \"{}\". Their final score is {}. Thanks for playin', and have yourself a mighty \
                 fine day! [system: end_call]",
                word, total_score
            ),
        };

        // Round-ending outcomes get a durable completion write and, on the
        // final round, kick off the leaderboard flow.
        let mut trailing = Vec::new();
        match &outcome {
            GuessOutcome::Correct {
                word,
                guess_count,
                round_score,
                total_score,
                final_round,
            } => {
                if let Some(session_id) = engine.session_id() {
                    self.spawn_complete_session(
                        session_id,
                        *guess_count,
                        Some(*round_score),
                        Some(word.clone()),
                    );
                }
                if *final_round {
                    trailing = self.run_leaderboard_check(&mut engine, *total_score).await;
                }
            }
            GuessOutcome::RoundLost {
                attempts,
                total_score,
                final_round,
                ..
            } => {
                if let Some(session_id) = engine.session_id() {
                    self.spawn_complete_session(session_id, *attempts, None, None);
                }
                if *final_round {
                    trailing = self.run_leaderboard_check(&mut engine, *total_score).await;
                }
            }
            _ => {}
        }

        let mut messages = vec![
            ServerMessage::ToolResult { text },
            ServerMessage::StateUpdate {
                snapshot: engine.snapshot(),
            },
        ];
        messages.extend(trailing);
        messages
    }

    async fn render_game_status(&self, session: &PlayerSession) -> String {
        let engine = session.engine.read().await;

        if engine.match_id().is_none() {
            return "The game hasn't started yet. The user needs to say 'start game'.".to_string();
        }
        let Some(word) = engine.current_word() else {
            return "The game is loading. I'm picking a word.".to_string();
        };

        let snapshot = engine.snapshot();
        let target = target_text(word);

        if snapshot.round_status != RoundStatus::Playing {
            return format!(
                "The round is over. The word was \"{}\". The user's total score is {}. The user \
                 can start the next round by saying \"next word\" or see the leaderboard if the \
                 game is over.",
                target, snapshot.total_score
            );
        }

        let mut report = format!(
            "The secret word is \"{}\". The secret clue for you to use is \"{}\". We are in \
             round {} of {}. The total score is {}. The theme is \"{}\". The word has {} \
             letters. The user has {} guesses left. ",
            target,
            clue_text(word),
            snapshot.round_number,
            MAX_ROUNDS,
            snapshot.total_score,
            theme_text(word),
            target.chars().count(),
            snapshot.guesses_left,
        );

        if snapshot.guessed_words.is_empty() {
            report.push_str("The user has not made any guesses yet.");
        } else {
            let incorrect = snapshot
                .guessed_words
                .iter()
                .filter(|w| **w != target)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            let incorrect = if incorrect.is_empty() {
                "none".to_string()
            } else {
                incorrect
            };
            report.push_str(&format!("The incorrect guesses so far are: {}.", incorrect));
        }
        report
    }

    async fn handle_reset_game(&self, session: &PlayerSession) -> Vec<ServerMessage> {
        let word = self.fetch_word_or_fallback().await;
        let match_id = Uuid::new_v4();
        let session_id = self.open_session(&word, match_id).await;

        let mut engine = session.engine.write().await;
        if let Some(previous) = engine.session_id() {
            if engine.snapshot().round_status == RoundStatus::Playing {
                self.spawn_abandon_session(previous);
            }
        }
        engine.start_match(match_id, word.clone(), session_id);
        info!(%match_id, "new match started");

        let text = format!(
            "The secret word for you to know is \"{}\" and the secret clue is \"{}\". Now, tell \
             the user a new game has started. This is round 1 of {}. The new word is from the \
             theme \"{}\" and has {} letters. Encourage them to make their first guess.",
            target_text(&word),
            clue_text(&word),
            MAX_ROUNDS,
            theme_text(&word),
            target_text(&word).chars().count(),
        );

        vec![
            ServerMessage::ToolResult { text },
            ServerMessage::StateUpdate {
                snapshot: engine.snapshot(),
            },
        ]
    }

    async fn handle_start_next_round(&self, session: &PlayerSession) -> Vec<ServerMessage> {
        let mut engine = session.engine.write().await;

        match engine.next_round_gate() {
            NextRoundGate::NoMatch => vec![ServerMessage::ToolResult {
                text: "The game hasn't started yet. The user needs to say 'start game' first."
                    .to_string(),
            }],
            NextRoundGate::RoundStillActive => vec![ServerMessage::ToolResult {
                text: "The current round is still in progress. Tell the user to keep guessing."
                    .to_string(),
            }],
            NextRoundGate::MatchComplete { total_score } => {
                let text = format!(
                    "The game is already over. You have completed all {} rounds. Their final \
                     score is {}. Thanks for playin', and have yourself a mighty fine day! \
                     [system: end_call]",
                    MAX_ROUNDS, total_score
                );
                let trailing = self.run_leaderboard_check(&mut engine, total_score).await;
                let mut messages = vec![
                    ServerMessage::ToolResult { text },
                    ServerMessage::StateUpdate {
                        snapshot: engine.snapshot(),
                    },
                ];
                messages.extend(trailing);
                messages
            }
            NextRoundGate::Ready { .. } => {
                let Some(match_id) = engine.match_id() else {
                    return vec![ServerMessage::ToolResult {
                        text: "The game hasn't started yet. The user needs to say 'start game' \
                               first."
                            .to_string(),
                    }];
                };

                let word = self.fetch_word_or_fallback().await;
                let session_id = self.open_session(&word, match_id).await;

                let Some(next_round) = engine.start_next_round(word.clone(), session_id) else {
                    return vec![ServerMessage::ToolResult {
                        text: "The current round is still in progress. Tell the user to keep \
                               guessing."
                            .to_string(),
                    }];
                };

                let text = format!(
                    "The secret word for round {} is \"{}\" and the secret clue is \"{}\". Now, \
                     tell the user that round {} is starting. The theme is \"{}\" and the word \
                     has {} letters.",
                    next_round,
                    target_text(&word),
                    clue_text(&word),
                    next_round,
                    theme_text(&word),
                    target_text(&word).chars().count(),
                );

                vec![
                    ServerMessage::ToolResult { text },
                    ServerMessage::StateUpdate {
                        snapshot: engine.snapshot(),
                    },
                ]
            }
        }
    }

    async fn handle_decline_leaderboard(&self, session: &PlayerSession) -> Vec<ServerMessage> {
        let mut engine = session.engine.write().await;
        engine.resolve_leaderboard();

        vec![
            ServerMessage::LeaderboardShown {
                message: None,
                entries: self.fetch_entries_or_empty().await,
            },
            ServerMessage::StateUpdate {
                snapshot: engine.snapshot(),
            },
        ]
    }

    /// The round never blocks on the word backend: an empty pool or a failed
    /// query plays the fallback word instead.
    async fn fetch_word_or_fallback(&self) -> Word {
        match self.words.fetch_random_word().await {
            Ok(Some(word)) => word,
            Ok(None) => {
                warn!("Word pool is empty, playing the fallback word");
                fallback_word()
            }
            Err(e) => {
                warn!("Failed to fetch a word, playing the fallback: {}", e);
                fallback_word()
            }
        }
    }

    /// A failed insert leaves the round untracked rather than unplayable.
    async fn open_session(&self, word: &Word, match_id: Uuid) -> Option<SessionId> {
        match self.sessions.create_session(word.id, match_id).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(%match_id, "Failed to create game session, playing untracked: {}", e);
                None
            }
        }
    }

    /// Flag the open session row when a connection drops mid-round, so it
    /// does not linger as `active`.
    pub async fn abandon_active_round(&self, session: &PlayerSession) {
        let engine = session.engine.read().await;
        if let Some(session_id) = engine.session_id() {
            if engine.snapshot().round_status == RoundStatus::Playing {
                self.spawn_abandon_session(session_id);
            }
        }
    }

    fn spawn_abandon_session(&self, session_id: SessionId) {
        let repo = self.sessions.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.abandon_session(session_id).await {
                warn!(%session_id, "Failed to mark session abandoned: {}", e);
            }
        });
    }

    fn spawn_complete_session(
        &self,
        session_id: SessionId,
        attempts: u32,
        score: Option<i32>,
        correct_guess: Option<String>,
    ) {
        let repo = self.sessions.clone();
        tokio::spawn(async move {
            if let Err(e) = repo
                .complete_session(session_id, attempts, score, correct_guess.as_deref())
                .await
            {
                warn!(%session_id, "Failed to record round completion: {}", e);
            }
        });
    }

    async fn fetch_entries_or_empty(&self) -> Vec<LeaderboardEntry> {
        match self.leaderboard.top_entries(LEADERBOARD_SIZE as u64).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to fetch leaderboard entries: {}", e);
                Vec::new()
            }
        }
    }

    /// Qualification uses the pre-insertion top-20 snapshot; a qualified
    /// player is prompted for a name, everyone else sees the board with a
    /// consolation. A failed score query shows the board rather than leaving
    /// the match stuck in the leaderboard phase.
    async fn run_leaderboard_check(
        &self,
        engine: &mut MatchEngine,
        final_score: i32,
    ) -> Vec<ServerMessage> {
        if engine.phase() != MatchPhase::InProgress {
            return Vec::new();
        }
        engine.begin_leaderboard_check();

        match self.leaderboard.top_scores(LEADERBOARD_SIZE as u64).await {
            Ok(scores) => match leaderboard_decision(final_score, &scores) {
                LeaderboardDecision::Qualified => {
                    vec![ServerMessage::LeaderboardPrompt { final_score }]
                }
                LeaderboardDecision::NotQualified => {
                    engine.resolve_leaderboard();
                    vec![ServerMessage::LeaderboardShown {
                        message: Some(CONSOLATION_MESSAGE.to_string()),
                        entries: self.fetch_entries_or_empty().await,
                    }]
                }
            },
            Err(e) => {
                warn!("Leaderboard check failed, showing the board: {}", e);
                engine.resolve_leaderboard();
                vec![ServerMessage::LeaderboardShown {
                    message: None,
                    entries: Vec::new(),
                }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ConnectionId, SessionManager};
    use game_persistence::connection::connect_to_memory_database;
    use game_persistence::entities::game_sessions::SessionStatus;
    use game_types::LeaderboardSubmission;
    use migration::{Migrator, MigratorTrait};
    use std::time::Duration;

    async fn setup() -> (ToolHandler, Arc<PlayerSession>, Arc<LeaderboardRepository>) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let words = Arc::new(WordRepository::new(db.clone()));
        let sessions = Arc::new(SessionRepository::new(db.clone()));
        let leaderboard = Arc::new(LeaderboardRepository::new(db));
        let handler = ToolHandler::new(words, sessions, leaderboard.clone());

        let manager = SessionManager::new();
        let session = manager.create_session(ConnectionId::new()).await;
        (handler, session, leaderboard)
    }

    async fn setup_with_sessions() -> (ToolHandler, Arc<PlayerSession>, Arc<SessionRepository>) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let words = Arc::new(WordRepository::new(db.clone()));
        let sessions = Arc::new(SessionRepository::new(db.clone()));
        let leaderboard = Arc::new(LeaderboardRepository::new(db));
        let handler = ToolHandler::new(words, sessions.clone(), leaderboard);

        let manager = SessionManager::new();
        let session = manager.create_session(ConnectionId::new()).await;
        (handler, session, sessions)
    }

    // Round writes are fire-and-forget; poll until the row reaches the
    // expected status.
    async fn wait_for_status(
        sessions: &SessionRepository,
        session_id: SessionId,
        expected: SessionStatus,
    ) -> SessionStatus {
        for _ in 0..50 {
            let model = sessions.find_session(session_id).await.unwrap().unwrap();
            if model.status == expected {
                return model.status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        sessions.find_session(session_id).await.unwrap().unwrap().status
    }

    fn tool_text(messages: &[ServerMessage]) -> &str {
        match messages.first() {
            Some(ServerMessage::ToolResult { text }) => text,
            other => panic!("Expected ToolResult first, got {:?}", other),
        }
    }

    async fn current_target(session: &PlayerSession) -> String {
        let engine = session.engine.read().await;
        target_text(engine.current_word().expect("round should be open"))
    }

    async fn win_current_round(handler: &ToolHandler, session: &PlayerSession) -> Vec<ServerMessage> {
        let target = current_target(session).await;
        handler
            .handle_message(session, ClientMessage::SubmitGuess { word: target })
            .await
    }

    #[tokio::test]
    async fn test_guess_before_match_starts() {
        let (handler, session, _) = setup().await;
        let messages = handler
            .handle_message(
                &session,
                ClientMessage::SubmitGuess {
                    word: "dog".to_string(),
                },
            )
            .await;
        assert!(tool_text(&messages).contains("still thinking of a word"));
    }

    #[tokio::test]
    async fn test_status_before_match_starts() {
        let (handler, session, _) = setup().await;
        let messages = handler
            .handle_message(&session, ClientMessage::GetGameStatus)
            .await;
        assert!(tool_text(&messages).contains("hasn't started yet"));
    }

    #[tokio::test]
    async fn test_reset_game_starts_round_one() {
        let (handler, session, _) = setup().await;
        let messages = handler.handle_message(&session, ClientMessage::ResetGame).await;

        let text = tool_text(&messages);
        assert!(text.contains("a new game has started"));
        assert!(text.contains("round 1 of 3"));
        // The secret word is disclosed to the agent
        let target = current_target(&session).await;
        assert!(text.contains(&format!("\"{}\"", target)));

        match &messages[1] {
            ServerMessage::StateUpdate { snapshot } => {
                assert_eq!(snapshot.round_number, 1);
                assert_eq!(snapshot.phase, MatchPhase::InProgress);
                assert!(snapshot.match_id.is_some());
            }
            other => panic!("Expected StateUpdate, got {:?}", other),
        }

        // Seeded words produce a tracked round
        assert!(session.engine.read().await.session_id().is_some());
    }

    #[tokio::test]
    async fn test_wrong_then_correct_guess() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;

        let messages = handler
            .handle_message(
                &session,
                ClientMessage::SubmitGuess {
                    word: "xylophone".to_string(),
                },
            )
            .await;
        let text = tool_text(&messages);
        assert!(text.contains("INCORRECT"));
        assert!(text.contains("9 guesses left"));

        let messages = win_current_round(&handler, &session).await;
        let text = tool_text(&messages);
        assert!(text.contains("was CORRECT"));
        assert!(text.contains("scored 90 points"));
        assert!(text.contains("startNextRound"));
        assert!(!text.contains("end_call"));
    }

    #[tokio::test]
    async fn test_duplicate_guess_reported() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;

        for _ in 0..2 {
            handler
                .handle_message(
                    &session,
                    ClientMessage::SubmitGuess {
                        word: "xylophone".to_string(),
                    },
                )
                .await;
        }
        let messages = handler
            .handle_message(
                &session,
                ClientMessage::SubmitGuess {
                    word: "Xylophone ".to_string(),
                },
            )
            .await;
        assert!(tool_text(&messages).contains("already guessed the word xylophone"));
    }

    #[tokio::test]
    async fn test_guess_after_round_won_instructs_advance() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;
        win_current_round(&handler, &session).await;

        let messages = handler
            .handle_message(
                &session,
                ClientMessage::SubmitGuess {
                    word: "xylophone".to_string(),
                },
            )
            .await;
        let text = tool_text(&messages);
        assert!(text.contains("round is already over"));
        assert!(text.contains("startNextRound"));
    }

    #[tokio::test]
    async fn test_start_next_round_before_match() {
        let (handler, session, _) = setup().await;
        let messages = handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        assert!(tool_text(&messages).contains("start game"));
    }

    #[tokio::test]
    async fn test_start_next_round_while_round_active() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;
        let messages = handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        assert!(tool_text(&messages).contains("still in progress"));
    }

    #[tokio::test]
    async fn test_start_next_round_midplay_final_round_ends_match() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;
        win_current_round(&handler, &session).await;
        handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        win_current_round(&handler, &session).await;
        handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;

        // Round 3 is mid-play; asking to advance ends the match anyway
        handler
            .handle_message(
                &session,
                ClientMessage::SubmitGuess {
                    word: "xylophone".to_string(),
                },
            )
            .await;
        let messages = handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;

        let text = tool_text(&messages);
        assert!(text.contains("already over"));
        assert!(text.contains("[system: end_call]"));
        assert!(messages.iter().any(|m| matches!(
            m,
            ServerMessage::LeaderboardPrompt { final_score: 200 }
        )));
        assert_eq!(
            session.engine.read().await.phase(),
            MatchPhase::AwaitingLeaderboard
        );
    }

    #[tokio::test]
    async fn test_reset_mid_round_abandons_previous_session() {
        let (handler, session, sessions) = setup_with_sessions().await;

        handler.handle_message(&session, ClientMessage::ResetGame).await;
        let first = session.engine.read().await.session_id().unwrap();
        handler
            .handle_message(
                &session,
                ClientMessage::SubmitGuess {
                    word: "xylophone".to_string(),
                },
            )
            .await;

        handler.handle_message(&session, ClientMessage::ResetGame).await;

        let status = wait_for_status(&sessions, first, SessionStatus::Abandoned).await;
        assert_eq!(status, SessionStatus::Abandoned);

        // The new round has its own tracked session
        let second = session.engine.read().await.session_id().unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_disconnect_mid_round_abandons_session() {
        let (handler, session, sessions) = setup_with_sessions().await;

        handler.handle_message(&session, ClientMessage::ResetGame).await;
        let session_id = session.engine.read().await.session_id().unwrap();

        handler.abandon_active_round(&session).await;

        let status = wait_for_status(&sessions, session_id, SessionStatus::Abandoned).await;
        assert_eq!(status, SessionStatus::Abandoned);
    }

    #[tokio::test]
    async fn test_abandon_skips_finished_round() {
        let (handler, session, sessions) = setup_with_sessions().await;

        handler.handle_message(&session, ClientMessage::ResetGame).await;
        let session_id = session.engine.read().await.session_id().unwrap();
        win_current_round(&handler, &session).await;

        let status = wait_for_status(&sessions, session_id, SessionStatus::Completed).await;
        assert_eq!(status, SessionStatus::Completed);

        handler.abandon_active_round(&session).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let model = sessions.find_session(session_id).await.unwrap().unwrap();
        assert_eq!(model.status, SessionStatus::Completed);
    }

    #[tokio::test]
    async fn test_full_match_prompts_for_leaderboard() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;
        win_current_round(&handler, &session).await;

        let messages = handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        assert!(tool_text(&messages).contains("round 2"));
        win_current_round(&handler, &session).await;

        handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        let messages = win_current_round(&handler, &session).await;

        let text = tool_text(&messages);
        assert!(text.contains("final total score is 300"));
        assert!(text.contains("[system: end_call]"));

        // Empty board always qualifies
        assert!(messages.iter().any(|m| matches!(
            m,
            ServerMessage::LeaderboardPrompt { final_score: 300 }
        )));
        assert_eq!(
            session.engine.read().await.phase(),
            MatchPhase::AwaitingLeaderboard
        );
    }

    #[tokio::test]
    async fn test_full_match_consolation_when_board_is_full() {
        let (handler, session, leaderboard) = setup().await;
        for i in 0..20 {
            leaderboard
                .insert_entry(&LeaderboardSubmission {
                    player_name: format!("player{}", i),
                    email: None,
                    total_score: 500,
                })
                .await
                .unwrap();
        }

        handler.handle_message(&session, ClientMessage::ResetGame).await;
        win_current_round(&handler, &session).await;
        handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        win_current_round(&handler, &session).await;
        handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        let messages = win_current_round(&handler, &session).await;

        let shown = messages.iter().find_map(|m| match m {
            ServerMessage::LeaderboardShown { message, entries } => Some((message, entries)),
            _ => None,
        });
        let (message, entries) = shown.expect("board should be shown");
        assert_eq!(message.as_deref(), Some(CONSOLATION_MESSAGE));
        assert_eq!(entries.len(), 20);
        assert_eq!(
            session.engine.read().await.phase(),
            MatchPhase::LeaderboardShown
        );
    }

    #[tokio::test]
    async fn test_decline_leaderboard_resolves_flow() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;
        win_current_round(&handler, &session).await;
        handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        win_current_round(&handler, &session).await;
        handler
            .handle_message(&session, ClientMessage::StartNextRound)
            .await;
        win_current_round(&handler, &session).await;

        let messages = handler
            .handle_message(&session, ClientMessage::DeclineLeaderboard)
            .await;
        assert!(messages
            .iter()
            .any(|m| matches!(m, ServerMessage::LeaderboardShown { .. })));
        assert_eq!(
            session.engine.read().await.phase(),
            MatchPhase::LeaderboardShown
        );
    }

    #[tokio::test]
    async fn test_status_reports_secret_and_progress() {
        let (handler, session, _) = setup().await;
        handler.handle_message(&session, ClientMessage::ResetGame).await;
        handler
            .handle_message(
                &session,
                ClientMessage::SubmitGuess {
                    word: "xylophone".to_string(),
                },
            )
            .await;

        let messages = handler
            .handle_message(&session, ClientMessage::GetGameStatus)
            .await;
        let text = tool_text(&messages);
        let target = current_target(&session).await;
        assert!(text.contains(&format!("The secret word is \"{}\"", target)));
        assert!(text.contains("round 1 of 3"));
        assert!(text.contains("9 guesses left"));
        assert!(text.contains("incorrect guesses so far are: xylophone"));
    }

    #[tokio::test]
    async fn test_heartbeat_is_silent() {
        let (handler, session, _) = setup().await;
        let messages = handler.handle_message(&session, ClientMessage::Heartbeat).await;
        assert!(messages.is_empty());
    }
}
