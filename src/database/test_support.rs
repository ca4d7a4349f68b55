//! 测试辅助：内存数据库与样例数据

use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use crate::database::db::connect_url;
use crate::database::dto::{InsertGameData, InsertReviewData};

/// 未执行迁移的内存数据库
pub async fn empty_memory_db() -> DatabaseConnection {
    connect_url("sqlite::memory:").await.unwrap()
}

/// 已执行全部迁移的内存数据库
pub async fn memory_db() -> DatabaseConnection {
    let db = empty_memory_db().await;
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn sample_game(title: &str) -> InsertGameData {
    InsertGameData {
        title: title.to_string(),
        genre: "Roguelike".to_string(),
        platform: "PC".to_string(),
        price: 25,
    }
}

pub fn sample_review(game_id: i32, score: i32) -> InsertReviewData {
    InsertReviewData {
        game_id,
        score,
        comment: format!("scored {}", score),
    }
}
