use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect};

use crate::entities::{prelude::*, words};
use game_types::Word;

pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_word(model: words::Model) -> Word {
        Word {
            id: model.id,
            text: model.word,
            category: model.category,
            clue: model.clue,
        }
    }

    /// Pick one word uniformly-ish from the pool. Returns None on an empty
    /// table; callers fall back to the default word in that case.
    pub async fn fetch_random_word(&self) -> Result<Option<Word>> {
        let total = Words::find().count(&self.db).await?;
        if total == 0 {
            return Ok(None);
        }

        // Simple random selection (in production, use proper RNG)
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::time::SystemTime::now().hash(&mut hasher);
        let offset = hasher.finish() % total;

        let model = Words::find().offset(offset).limit(1).one(&self.db).await?;
        Ok(model.map(Self::model_to_word))
    }

    pub async fn word_count(&self) -> Result<u64> {
        Ok(Words::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> WordRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        WordRepository::new(db)
    }

    #[tokio::test]
    async fn test_fetch_random_word_from_seed() {
        let repo = setup_test_db().await;

        assert!(repo.word_count().await.unwrap() > 0);

        let word = repo.fetch_random_word().await.unwrap();
        assert!(word.is_some());

        let word = word.unwrap();
        assert!(!word.text.is_empty());
        assert!(word.clue.is_some());
    }

    #[tokio::test]
    async fn test_fetch_random_word_empty_table() {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        // Clear the seed so the pool is genuinely empty

        Words::delete_many().exec(&db).await.unwrap();

        let repo = WordRepository::new(db);
        let word = repo.fetch_random_word().await.unwrap();
        assert!(word.is_none());
    }
}
