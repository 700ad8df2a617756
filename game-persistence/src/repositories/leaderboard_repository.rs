use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{match_leaderboard, prelude::*};
use game_types::{LeaderboardEntry, LeaderboardSubmission};

pub struct LeaderboardRepository {
    db: DatabaseConnection,
}

impl LeaderboardRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_entry(model: match_leaderboard::Model) -> LeaderboardEntry {
        LeaderboardEntry {
            id: model.id,
            player_name: model.player_name,
            email: model.email,
            total_score: model.total_score,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    /// Highest scores first; ties keep insertion order from the database.
    pub async fn top_entries(&self, limit: u64) -> Result<Vec<LeaderboardEntry>> {
        let models = MatchLeaderboard::find()
            .order_by_desc(match_leaderboard::Column::TotalScore)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_entry).collect())
    }

    /// Just the scores, for the qualification check before a match's final
    /// entry is written.
    pub async fn top_scores(&self, limit: u64) -> Result<Vec<i32>> {
        let models = MatchLeaderboard::find()
            .order_by_desc(match_leaderboard::Column::TotalScore)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.total_score).collect())
    }

    pub async fn insert_entry(
        &self,
        submission: &LeaderboardSubmission,
    ) -> Result<LeaderboardEntry> {
        let entry = match_leaderboard::ActiveModel {
            id: Set(Uuid::new_v4()),
            player_name: Set(submission.player_name.clone()),
            email: Set(submission.email.clone()),
            total_score: Set(submission.total_score),
            created_at: Set(chrono::Utc::now().into()),
        };

        let model = entry.insert(&self.db).await?;
        Ok(Self::model_to_entry(model))
    }
}
