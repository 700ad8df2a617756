use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Starter word pool so a fresh database is immediately playable.
const SEED_WORDS: &[(&str, &str, &str)] = &[
    ("cactus", "Desert Life", "Prickly and patient, it drinks once a year"),
    ("lasso", "Ranch Gear", "A loop of rope that catches more than fish"),
    ("saloon", "Frontier Town", "Swinging doors and sarsaparilla"),
    ("coyote", "Animal", "It howls at the moon but never gets an answer"),
    ("canyon", "Landscape", "A river's lifetime of digging"),
    ("sheriff", "Frontier Town", "Wears a star but isn't in the sky"),
    ("wagon", "Ranch Gear", "Four wheels, no engine, plenty of dust"),
    ("tumbleweed", "Desert Life", "It travels the desert without legs"),
    ("rattlesnake", "Animal", "Its warning comes from the tail end"),
    ("stampede", "Ranch Life", "A thousand hooves with one bad idea"),
    ("harmonica", "Campfire", "Pocket-sized music powered by breath"),
    ("lantern", "Campfire", "A flame in a glass overcoat"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Words::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Words::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Words::Word).string().not_null())
                    .col(ColumnDef::new(Words::Category).string())
                    .col(ColumnDef::new(Words::Clue).string())
                    .col(
                        ColumnDef::new(Words::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert()
            .into_table(Words::Table)
            .columns([Words::Id, Words::Word, Words::Category, Words::Clue])
            .to_owned();
        for (word, category, clue) in SEED_WORDS {
            seed.values_panic([
                Uuid::new_v4().into(),
                (*word).into(),
                (*category).into(),
                (*clue).into(),
            ]);
        }
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Words::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Words {
    Table,
    Id,
    Word,
    Category,
    Clue,
    CreatedAt,
}
