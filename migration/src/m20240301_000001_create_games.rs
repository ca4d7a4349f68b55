//! 创建 games 表
//!
//! games 是父表，不依赖任何其他表，总是最先创建。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::Title).text().not_null())
                    .col(ColumnDef::new(Games::Genre).text().not_null())
                    .col(ColumnDef::new(Games::Platform).text().not_null())
                    .col(ColumnDef::new(Games::Price).integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Games {
    Table,
    Id,
    Title,
    Genre,
    Platform,
    Price,
}
