use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 250))
                    .col(integer(Movies::Year))
                    .col(text(Movies::Description))
                    .col(double_null(Movies::Rating))
                    .col(integer_null(Movies::Rank))
                    .col(string_len_null(Movies::Review, 250))
                    .col(string(Movies::PosterUrl))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_title_unique")
                    .table(Movies::Table)
                    .col(Movies::Title)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_movies_title_unique").table(Movies::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Year,
    Description,
    Rating,
    Rank,
    Review,
    PosterUrl,
}
