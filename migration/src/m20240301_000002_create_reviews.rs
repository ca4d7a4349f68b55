//! 创建 reviews 表
//!
//! reviews.game_id 外键指向 games.id，删除游戏时级联删除其评论。

use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_games::Games;

const FK_REVIEWS_GAME_ID: &str = "fk_reviews_game_id";
const IDX_REVIEWS_GAME_ID: &str = "idx_reviews_game_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite 不支持 ALTER TABLE 添加外键，必须在建表时声明
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::Score).integer().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text().not_null())
                    .col(ColumnDef::new(Reviews::GameId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REVIEWS_GAME_ID)
                            .from(Reviews::Table, Reviews::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_REVIEWS_GAME_ID)
                    .table(Reviews::Table)
                    .col(Reviews::GameId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 索引随表一起删除
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    Score,
    Comment,
    GameId,
}
