//! 评论数据仓库
//!
//! reviews 表的 CRUD 操作。按外键筛选的显式查询也在这里，
//! 与 relations 模块中基于关系的遍历互为对照。

use crate::database::dto::InsertReviewData;
use crate::entity::prelude::*;
use crate::entity::reviews;
use sea_orm::*;

/// 评论数据仓库
pub struct ReviewsRepository;

impl ReviewsRepository {
    /// 插入评论，返回新评论的 ID
    ///
    /// game_id 不存在时由 SQLite 外键约束拒绝，错误原样返回
    pub async fn insert<C>(db: &C, review: InsertReviewData) -> Result<i32, DbErr>
    where
        C: ConnectionTrait,
    {
        let review_active = reviews::ActiveModel {
            id: NotSet,
            score: Set(review.score),
            comment: Set(review.comment),
            game_id: Set(review.game_id),
        };

        let result = review_active.insert(db).await?;
        Ok(result.id)
    }

    /// 删除评论
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
        Reviews::delete_by_id(id).exec(db).await
    }

    /// 根据 ID 查询评论
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<reviews::Model>, DbErr> {
        Reviews::find_by_id(id).one(db).await
    }

    /// 获取所有评论（按 ID 升序）
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<reviews::Model>, DbErr> {
        Reviews::find().order_by_asc(reviews::Column::Id).all(db).await
    }

    /// 按外键筛选指定游戏的评论（按 ID 升序）
    pub async fn find_by_game_id(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Vec<reviews::Model>, DbErr> {
        Reviews::find()
            .filter(reviews::Column::GameId.eq(game_id))
            .order_by_asc(reviews::Column::Id)
            .all(db)
            .await
    }

    /// 按外键统计指定游戏的评论数量
    pub async fn count_by_game_id(db: &DatabaseConnection, game_id: i32) -> Result<u64, DbErr> {
        Reviews::find()
            .filter(reviews::Column::GameId.eq(game_id))
            .count(db)
            .await
    }

    /// 获取评论总数
    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Reviews::find().count(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::games_repository::GamesRepository;
    use crate::database::test_support::{memory_db, sample_game, sample_review};

    #[tokio::test]
    async fn review_for_unknown_game_is_rejected_by_storage() {
        let db = memory_db().await;

        let err = ReviewsRepository::insert(&db, sample_review(999, 7))
            .await
            .unwrap_err();

        assert!(
            err.to_string().contains("FOREIGN KEY"),
            "unexpected error: {err}"
        );
        assert_eq!(ReviewsRepository::count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn filter_only_returns_reviews_of_that_game() {
        let db = memory_db().await;
        let hades = GamesRepository::insert(&db, sample_game("Hades")).await.unwrap();
        let tunic = GamesRepository::insert(&db, sample_game("Tunic")).await.unwrap();

        ReviewsRepository::insert(&db, sample_review(hades, 9)).await.unwrap();
        ReviewsRepository::insert(&db, sample_review(tunic, 8)).await.unwrap();
        ReviewsRepository::insert(&db, sample_review(hades, 10)).await.unwrap();

        let scores: Vec<i32> = ReviewsRepository::find_by_game_id(&db, hades)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.score)
            .collect();
        assert_eq!(scores, [9, 10]);
        assert_eq!(ReviewsRepository::count_by_game_id(&db, tunic).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_a_game_cascades_to_its_reviews() {
        let db = memory_db().await;
        let hades = GamesRepository::insert(&db, sample_game("Hades")).await.unwrap();
        let review = ReviewsRepository::insert(&db, sample_review(hades, 9)).await.unwrap();

        GamesRepository::delete(&db, hades).await.unwrap();

        assert!(ReviewsRepository::find_by_id(&db, review).await.unwrap().is_none());
        assert_eq!(ReviewsRepository::count(&db).await.unwrap(), 0);
    }
}
