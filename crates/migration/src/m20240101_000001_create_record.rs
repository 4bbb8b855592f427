//! Create the `record` table.
//!
//! One row per stored document: an opaque uuid key assigned by the
//! store, a revision stamp rewritten on every replace, and the entity
//! body (`name`, `age`). `name` carries no uniqueness constraint; the
//! store enforces it by lookup-before-create only.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Record::Table)
                    .if_not_exists()
                    .col(uuid(Record::Key).primary_key())
                    .col(string_len(Record::Revision, 64).not_null())
                    .col(string_len(Record::Name, 128).not_null())
                    .col(integer(Record::Age).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Record::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Record {
    Table,
    Key,
    Revision,
    Name,
    Age,
}
