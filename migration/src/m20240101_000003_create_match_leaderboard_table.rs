use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MatchLeaderboard::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchLeaderboard::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MatchLeaderboard::PlayerName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MatchLeaderboard::Email).string())
                    .col(
                        ColumnDef::new(MatchLeaderboard::TotalScore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MatchLeaderboard::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on total_score for top-20 queries
        manager
            .create_index(
                Index::create()
                    .name("idx_match_leaderboard_total_score")
                    .table(MatchLeaderboard::Table)
                    .col(MatchLeaderboard::TotalScore)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MatchLeaderboard::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MatchLeaderboard {
    Table,
    Id,
    PlayerName,
    Email,
    TotalScore,
    CreatedAt,
}
