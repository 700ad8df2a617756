use anyhow::Result;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::entities::{game_sessions, game_sessions::SessionStatus, prelude::*};
use game_types::{MatchId, SessionId, WordId};

pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert an `active` session row linking the round to its match and word.
    pub async fn create_session(&self, word_id: WordId, match_id: MatchId) -> Result<SessionId> {
        let id = Uuid::new_v4();
        let session = game_sessions::ActiveModel {
            id: Set(id),
            word_id: Set(word_id),
            match_id: Set(match_id),
            status: Set(SessionStatus::Active),
            attempts: Set(None),
            score: Set(None),
            correct_guess: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            end_time: Set(None),
        };

        GameSessions::insert(session).exec(&self.db).await?;
        Ok(id)
    }

    /// Finalize a round: mark completed with attempt count, and score plus
    /// the correct guess when the round was won.
    pub async fn complete_session(
        &self,
        session_id: SessionId,
        attempts: u32,
        score: Option<i32>,
        correct_guess: Option<&str>,
    ) -> Result<()> {
        let session = GameSessions::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Session not found: {}", session_id))?;

        let mut session: game_sessions::ActiveModel = session.into();
        session.status = Set(SessionStatus::Completed);
        session.attempts = Set(Some(attempts as i32));
        session.score = Set(score);
        session.correct_guess = Set(correct_guess.map(|s| s.to_string()));
        session.end_time = Set(Some(chrono::Utc::now().into()));

        GameSessions::update(session).exec(&self.db).await?;
        Ok(())
    }

    /// Mark a round that ended without an outcome, from a disconnect or a
    /// mid-round restart, so its row does not stay `active` forever.
    pub async fn abandon_session(&self, session_id: SessionId) -> Result<()> {
        let session = GameSessions::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Session not found: {}", session_id))?;

        let mut session: game_sessions::ActiveModel = session.into();
        session.status = Set(SessionStatus::Abandoned);
        session.end_time = Set(Some(chrono::Utc::now().into()));

        GameSessions::update(session).exec(&self.db).await?;
        Ok(())
    }

    pub async fn find_session(&self, session_id: SessionId) -> Result<Option<game_sessions::Model>> {
        Ok(GameSessions::find_by_id(session_id).one(&self.db).await?)
    }
}
