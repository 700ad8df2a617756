use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_words_table::Words;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameSessions::WordId).uuid().not_null())
                    .col(ColumnDef::new(GameSessions::MatchId).uuid().not_null())
                    .col(
                        ColumnDef::new(GameSessions::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(GameSessions::Attempts).integer())
                    .col(ColumnDef::new(GameSessions::Score).integer())
                    .col(ColumnDef::new(GameSessions::CorrectGuess).string())
                    .col(
                        ColumnDef::new(GameSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(GameSessions::EndTime).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_sessions_word_id")
                            .from(GameSessions::Table, GameSessions::WordId)
                            .to(Words::Table, Words::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Completed rounds of one match are read back together
        manager
            .create_index(
                Index::create()
                    .name("idx_game_sessions_match_id")
                    .table(GameSessions::Table)
                    .col(GameSessions::MatchId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameSessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameSessions {
    Table,
    Id,
    WordId,
    MatchId,
    Status,
    Attempts,
    Score,
    CorrectGuess,
    CreatedAt,
    EndTime,
}
