//! 关系遍历
//!
//! 评论 -> 游戏（唯一），游戏 -> 评论（零条或多条，按插入顺序）。
//! 两个方向都通过 SeaORM 的 `Related` 声明完成，这里不做任何额外计算。

use sea_orm::*;
use serde::Serialize;

use crate::database::repository::games_repository::GamesRepository;
use crate::database::repository::reviews_repository::ReviewsRepository;
use crate::entity::prelude::*;
use crate::entity::{games, reviews};

/// 查询评论所属的游戏
pub async fn game_of_review(
    db: &DatabaseConnection,
    review: &reviews::Model,
) -> Result<Option<games::Model>, DbErr> {
    review.find_related(Games).one(db).await
}

/// 查询游戏的全部评论（按 ID 升序，即插入顺序）
pub async fn reviews_of_game(
    db: &DatabaseConnection,
    game: &games::Model,
) -> Result<Vec<reviews::Model>, DbErr> {
    game.find_related(Reviews)
        .order_by_asc(reviews::Column::Id)
        .all(db)
        .await
}

/// 关系一致性问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationshipMismatch {
    /// 评论的 game_id 找不到对应游戏
    OrphanReview { review_id: i32, game_id: i32 },
    /// 通过关系找到的游戏与 game_id 不一致
    WrongParent {
        review_id: i32,
        game_id: i32,
        found_game_id: i32,
    },
    /// 关系遍历与按外键筛选得到的评论数量不一致
    CountMismatch {
        game_id: i32,
        related: u64,
        filtered: u64,
    },
}

/// 关系一致性检查结果
#[derive(Debug, Default, Clone, Serialize)]
pub struct RelationshipReport {
    pub games_checked: u64,
    pub reviews_checked: u64,
    pub mismatches: Vec<RelationshipMismatch>,
}

impl RelationshipReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// 检查整个数据库的关系一致性
///
/// - 每条评论：`review.game.id == review.game_id`
/// - 每个游戏：关系遍历得到的评论数 == 按外键筛选得到的评论数
///
/// 发现问题时记录在报告中，不会提前返回错误。
pub async fn verify_relationships(db: &DatabaseConnection) -> Result<RelationshipReport, DbErr> {
    let mut report = RelationshipReport::default();

    for review in ReviewsRepository::find_all(db).await? {
        report.reviews_checked += 1;
        match game_of_review(db, &review).await? {
            None => report.mismatches.push(RelationshipMismatch::OrphanReview {
                review_id: review.id,
                game_id: review.game_id,
            }),
            Some(game) if game.id != review.game_id => {
                report.mismatches.push(RelationshipMismatch::WrongParent {
                    review_id: review.id,
                    game_id: review.game_id,
                    found_game_id: game.id,
                })
            }
            Some(_) => {}
        }
    }

    for game in GamesRepository::find_all(db).await? {
        report.games_checked += 1;
        let related = reviews_of_game(db, &game).await?.len() as u64;
        let filtered = ReviewsRepository::count_by_game_id(db, game.id).await?;
        if related != filtered {
            report.mismatches.push(RelationshipMismatch::CountMismatch {
                game_id: game.id,
                related,
                filtered,
            });
        }
    }

    log::debug!(
        "关系检查完成: {} 个游戏, {} 条评论, {} 个问题",
        report.games_checked,
        report.reviews_checked,
        report.mismatches.len()
    );

    Ok(report)
}
