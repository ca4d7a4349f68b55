//! 游戏数据仓库
//!
//! games 表的 CRUD 操作，以及一次性加载游戏与其评论的查询。

use crate::database::dto::InsertGameData;
use crate::entity::prelude::*;
use crate::entity::{games, reviews};
use sea_orm::*;

/// 游戏数据仓库
pub struct GamesRepository;

impl GamesRepository {
    // ==================== 游戏 CRUD 操作 ====================

    /// 插入游戏数据，返回新游戏的 ID
    pub async fn insert<C>(db: &C, game: InsertGameData) -> Result<i32, DbErr>
    where
        C: ConnectionTrait,
    {
        let game_active = games::ActiveModel {
            id: NotSet,
            title: Set(game.title),
            genre: Set(game.genre),
            platform: Set(game.platform),
            price: Set(game.price),
        };

        let result = game_active.insert(db).await?;
        Ok(result.id)
    }

    /// 删除游戏，其评论由外键级联删除
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
        Games::delete_by_id(id).exec(db).await
    }

    // ==================== 查询操作 ====================

    /// 根据 ID 查询游戏
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<games::Model>, DbErr> {
        Games::find_by_id(id).one(db).await
    }

    /// 获取所有游戏（按 ID 升序，即插入顺序）
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<games::Model>, DbErr> {
        Games::find().order_by_asc(games::Column::Id).all(db).await
    }

    /// 获取所有游戏及其评论
    ///
    /// 单条 LEFT JOIN 查询完成加载，游戏与评论均按 ID 升序
    pub async fn find_all_with_reviews(
        db: &DatabaseConnection,
    ) -> Result<Vec<(games::Model, Vec<reviews::Model>)>, DbErr> {
        Games::find()
            .find_with_related(Reviews)
            .order_by_asc(games::Column::Id)
            .order_by_asc(reviews::Column::Id)
            .all(db)
            .await
    }

    /// 获取游戏总数
    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Games::find().count(db).await
    }
}
