//! 命令层服务
//!
//! 对 repository、relations、seed 等模块的薄封装，
//! 将 `DbErr` 转换为带上下文的错误信息，供命令行与交互式会话直接使用。

use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, SqlErr};
use serde::Serialize;
use std::path::Path;

use crate::database::dto::{GameWithReviews, InsertGameData, InsertReviewData, ReviewWithGame};
use crate::database::relations::{self, RelationshipReport};
use crate::database::repository::games_repository::GamesRepository;
use crate::database::repository::reviews_repository::ReviewsRepository;
use crate::database::schema::{self, SchemaDrift};
use crate::database::seed::{self, SeedData, SeedSummary};
use crate::entity::{games, reviews};

// ==================== 迁移相关 ====================

/// 单个迁移的状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

/// 查询所有迁移的执行状态
pub async fn migration_status(db: &DatabaseConnection) -> Result<Vec<MigrationState>, String> {
    let applied: Vec<String> = Migrator::get_applied_migrations(db)
        .await
        .map_err(|e| format!("查询迁移状态失败: {}", e))?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    Ok(Migrator::migrations()
        .iter()
        .map(|m| MigrationState {
            name: m.name().to_string(),
            applied: applied.iter().any(|name| name == m.name()),
        })
        .collect())
}

/// 执行待执行的迁移，返回本次执行的迁移名
///
/// 数据库已执行过部分迁移且仍有待执行迁移时，先备份数据库文件
pub async fn migrate_up(
    db: &DatabaseConnection,
    db_path: Option<&Path>,
    steps: Option<u32>,
) -> Result<Vec<String>, String> {
    let pending: Vec<String> = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| format!("查询待执行迁移失败: {}", e))?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    if pending.is_empty() {
        log::info!("没有待执行的迁移");
        return Ok(Vec::new());
    }

    // 已有迁移记录说明数据库中有数据，执行新迁移前先备份
    let has_history = !Migrator::get_applied_migrations(db)
        .await
        .map_err(|e| format!("查询迁移状态失败: {}", e))?
        .is_empty();

    if let Some(path) = db_path.filter(|_| has_history) {
        let label = pending.first().map(String::as_str).unwrap_or("pending");
        match migration::backup::backup_sqlite(path, label) {
            Ok(Some(backup)) => log::info!("迁移前已备份数据库: {}", backup.display()),
            Ok(None) => {}
            Err(e) => log::warn!("迁移前备份失败（继续执行）: {}", e),
        }
    }

    log::info!("开始执行数据库迁移...");
    Migrator::up(db, steps)
        .await
        .map_err(|e| format!("数据库迁移失败: {}", e))?;
    log::info!("数据库迁移完成");

    let count = steps.map_or(pending.len(), |n| pending.len().min(n as usize));
    Ok(pending.into_iter().take(count).collect())
}

/// 回滚迁移，默认回滚一步
pub async fn migrate_down(db: &DatabaseConnection, steps: Option<u32>) -> Result<(), String> {
    Migrator::down(db, Some(steps.unwrap_or(1)))
        .await
        .map_err(|e| format!("迁移回滚失败: {}", e))
}

/// 删除所有表后重新执行全部迁移
pub async fn migrate_fresh(db: &DatabaseConnection) -> Result<(), String> {
    Migrator::fresh(db)
        .await
        .map_err(|e| format!("重建数据库失败: {}", e))
}

/// 比较实体声明与数据库实际结构
pub async fn schema_diff(db: &DatabaseConnection) -> Result<Vec<SchemaDrift>, String> {
    schema::diff_schema(db)
        .await
        .map_err(|e| format!("模式比对失败: {}", e))
}

// ==================== 种子数据 ====================

/// 写入种子数据，未指定文件时使用内置数据
pub async fn seed_database(
    db: &DatabaseConnection,
    file: Option<&Path>,
    replace: bool,
) -> Result<SeedSummary, String> {
    let data = match file {
        Some(path) => SeedData::from_path(path)?,
        None => SeedData::builtin()?,
    };
    seed::seed(db, &data, replace)
        .await
        .map_err(|e| format!("写入种子数据失败: {}", e))
}

// ==================== 游戏数据相关 ====================

/// 插入游戏
pub async fn insert_game(db: &DatabaseConnection, game: InsertGameData) -> Result<i32, String> {
    GamesRepository::insert(db, game)
        .await
        .map_err(|e| format!("插入游戏数据失败: {}", e))
}

/// 获取所有游戏
pub async fn find_all_games(db: &DatabaseConnection) -> Result<Vec<games::Model>, String> {
    GamesRepository::find_all(db)
        .await
        .map_err(|e| format!("获取游戏列表失败: {}", e))
}

/// 获取所有游戏及其评论
pub async fn find_all_games_with_reviews(
    db: &DatabaseConnection,
) -> Result<Vec<GameWithReviews>, String> {
    GamesRepository::find_all_with_reviews(db)
        .await
        .map(|rows| {
            rows.into_iter()
                .map(|(game, reviews)| GameWithReviews { game, reviews })
                .collect()
        })
        .map_err(|e| format!("获取游戏列表失败: {}", e))
}

/// 根据 ID 查询游戏，并通过关系加载其评论
pub async fn find_game_with_reviews(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<GameWithReviews>, String> {
    let Some(game) = GamesRepository::find_by_id(db, id)
        .await
        .map_err(|e| format!("查询游戏失败: {}", e))?
    else {
        return Ok(None);
    };

    let reviews = relations::reviews_of_game(db, &game)
        .await
        .map_err(|e| format!("查询游戏评论失败: {}", e))?;

    Ok(Some(GameWithReviews { game, reviews }))
}

/// 删除游戏（级联删除其评论），返回受影响的行数
pub async fn delete_game(db: &DatabaseConnection, id: i32) -> Result<u64, String> {
    GamesRepository::delete(db, id)
        .await
        .map(|result| result.rows_affected)
        .map_err(|e| format!("删除游戏失败: {}", e))
}

// ==================== 评论数据相关 ====================

/// 插入评论
///
/// 外键约束失败时给出明确提示
pub async fn insert_review(
    db: &DatabaseConnection,
    review: InsertReviewData,
) -> Result<i32, String> {
    let game_id = review.game_id;
    ReviewsRepository::insert(db, review)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                format!("插入评论失败: 游戏 {} 不存在 ({})", game_id, e)
            }
            _ => format!("插入评论失败: {}", e),
        })
}

/// 获取评论列表，指定 game_id 时按外键筛选
pub async fn find_reviews(
    db: &DatabaseConnection,
    game_id: Option<i32>,
) -> Result<Vec<reviews::Model>, String> {
    match game_id {
        Some(game_id) => ReviewsRepository::find_by_game_id(db, game_id).await,
        None => ReviewsRepository::find_all(db).await,
    }
    .map_err(|e| format!("获取评论列表失败: {}", e))
}

/// 根据 ID 查询评论，并通过关系加载所属游戏
pub async fn find_review_with_game(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<ReviewWithGame>, String> {
    let Some(review) = ReviewsRepository::find_by_id(db, id)
        .await
        .map_err(|e| format!("查询评论失败: {}", e))?
    else {
        return Ok(None);
    };

    let game = relations::game_of_review(db, &review)
        .await
        .map_err(|e| format!("查询评论所属游戏失败: {}", e))?;

    Ok(Some(ReviewWithGame { review, game }))
}

/// 删除评论，返回受影响的行数
pub async fn delete_review(db: &DatabaseConnection, id: i32) -> Result<u64, String> {
    ReviewsRepository::delete(db, id)
        .await
        .map(|result| result.rows_affected)
        .map_err(|e| format!("删除评论失败: {}", e))
}

// ==================== 一致性检查 ====================

/// 检查关系一致性
pub async fn check_relationships(db: &DatabaseConnection) -> Result<RelationshipReport, String> {
    relations::verify_relationships(db)
        .await
        .map_err(|e| format!("关系检查失败: {}", e))
}
