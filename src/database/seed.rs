//! 种子数据
//!
//! 向数据库写入示例游戏与评论。内置数据位于 `data/seed.json`，
//! 也可以从任意 JSON 文件读取同样结构的数据。

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::database::dto::{InsertGameData, InsertReviewData};
use crate::database::repository::games_repository::GamesRepository;
use crate::database::repository::reviews_repository::ReviewsRepository;
use crate::entity::prelude::*;

const BUILTIN_SEED: &str = include_str!("../../data/seed.json");

/// 种子评论
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReview {
    pub score: i32,
    pub comment: String,
}

/// 种子游戏及其评论
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedGame {
    pub title: String,
    pub genre: String,
    pub platform: String,
    pub price: i32,
    #[serde(default)]
    pub reviews: Vec<SeedReview>,
}

/// 种子数据集
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub games: Vec<SeedGame>,
}

impl SeedData {
    /// 内置示例数据
    pub fn builtin() -> Result<Self, String> {
        serde_json::from_str(BUILTIN_SEED).map_err(|e| format!("内置种子数据解析失败: {}", e))
    }

    /// 从 JSON 文件读取种子数据
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("无法读取种子文件 {}: {}", path.display(), e))?;
        serde_json::from_str(&text)
            .map_err(|e| format!("种子文件 {} 格式错误: {}", path.display(), e))
    }

    pub fn review_count(&self) -> usize {
        self.games.iter().map(|g| g.reviews.len()).sum()
    }
}

/// 写入结果统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub games: usize,
    pub reviews: usize,
    pub replaced: bool,
}

/// 写入种子数据
///
/// 在单个事务中完成：`replace` 为真时先清空 reviews 与 games，
/// 然后插入全部游戏，再插入指向新游戏 ID 的评论。任一步失败则整体回滚。
pub async fn seed(
    db: &DatabaseConnection,
    data: &SeedData,
    replace: bool,
) -> Result<SeedSummary, DbErr> {
    let txn = db.begin().await?;

    if replace {
        let reviews = Reviews::delete_many().exec(&txn).await?;
        let games = Games::delete_many().exec(&txn).await?;
        log::info!(
            "已清空现有数据: {} 个游戏, {} 条评论",
            games.rows_affected,
            reviews.rows_affected
        );
    }

    // 游戏不依赖评论，先全部插入
    let mut game_ids = Vec::with_capacity(data.games.len());
    for game in &data.games {
        let id = GamesRepository::insert(
            &txn,
            InsertGameData {
                title: game.title.clone(),
                genre: game.genre.clone(),
                platform: game.platform.clone(),
                price: game.price,
            },
        )
        .await?;
        game_ids.push(id);
    }

    let mut review_count = 0;
    for (game, game_id) in data.games.iter().zip(game_ids) {
        for review in &game.reviews {
            ReviewsRepository::insert(
                &txn,
                InsertReviewData {
                    game_id,
                    score: review.score,
                    comment: review.comment.clone(),
                },
            )
            .await?;
            review_count += 1;
        }
    }

    txn.commit().await?;

    let summary = SeedSummary {
        games: data.games.len(),
        reviews: review_count,
        replaced: replace,
    };
    log::info!(
        "种子数据写入完成: {} 个游戏, {} 条评论",
        summary.games,
        summary.reviews
    );
    Ok(summary)
}
