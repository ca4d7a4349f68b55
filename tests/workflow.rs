//! 文件数据库上的完整流程：迁移 -> 模式比对 -> 种子数据 -> 双向遍历

use clap::Parser;
use game_reviews_lib::database::db::{close_connection, establish_connection};
use game_reviews_lib::database::{self, relations};
use game_reviews_lib::{execute, Cli};
use sea_orm::ConnectionTrait;

fn cli(db_path: &std::path::Path, args: &[&str]) -> Cli {
    let mut argv = vec!["game-reviews", "--database", db_path.to_str().unwrap()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn migrate_seed_and_traverse() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("game_reviews.db");

    execute(&cli(&db_path, &["migrate", "up"])).await.unwrap();
    execute(&cli(&db_path, &["schema", "diff"])).await.unwrap();
    execute(&cli(&db_path, &["seed"])).await.unwrap();
    execute(&cli(&db_path, &["check"])).await.unwrap();

    let db = establish_connection(&db_path).await.unwrap();

    assert!(database::schema_diff(&db).await.unwrap().is_empty());

    let game = database::find_game_with_reviews(&db, 1).await.unwrap().unwrap();
    let ids: Vec<i32> = game.reviews.iter().map(|r| r.id).collect();
    assert_eq!(ids, [1, 2, 3]);

    for review in database::find_reviews(&db, None).await.unwrap() {
        let parent = relations::game_of_review(&db, &review).await.unwrap().unwrap();
        assert_eq!(parent.id, review.game_id);
    }

    close_connection(db).await.unwrap();
}

#[tokio::test]
async fn data_commands_require_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("game_reviews.db");

    let err = execute(&cli(&db_path, &["games", "list"])).await.unwrap_err();
    assert!(err.contains("migrate up"), "{err}");
}

#[tokio::test]
async fn review_for_missing_game_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("game_reviews.db");
    execute(&cli(&db_path, &["migrate", "up"])).await.unwrap();

    let err = execute(&cli(
        &db_path,
        &["reviews", "add", "--game", "12", "--score", "4", "--comment", "meh"],
    ))
    .await
    .unwrap_err();
    assert!(err.starts_with("插入评论失败"), "{err}");
}

#[tokio::test]
async fn second_migration_run_backs_up_existing_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("game_reviews.db");

    execute(&cli(&db_path, &["migrate", "up", "-n", "1"])).await.unwrap();
    assert!(!dir.path().join("backups").exists());

    execute(&cli(&db_path, &["migrate", "up"])).await.unwrap();
    let backups: Vec<_> = std::fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .collect();
    assert_eq!(backups.len(), 1);
}

#[tokio::test]
async fn deleting_a_game_removes_its_reviews() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("game_reviews.db");
    execute(&cli(&db_path, &["migrate", "up"])).await.unwrap();
    execute(&cli(&db_path, &["seed"])).await.unwrap();

    execute(&cli(&db_path, &["games", "delete", "1"])).await.unwrap();

    let db = establish_connection(&db_path).await.unwrap();
    assert!(database::find_game_with_reviews(&db, 1).await.unwrap().is_none());
    assert_eq!(database::find_reviews(&db, Some(1)).await.unwrap().len(), 0);
    assert_eq!(database::find_reviews(&db, None).await.unwrap().len(), 3);
    close_connection(db).await.unwrap();
}

#[tokio::test]
async fn check_fails_on_orphan_review() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("game_reviews.db");
    execute(&cli(&db_path, &["migrate", "up"])).await.unwrap();
    execute(&cli(&db_path, &["seed"])).await.unwrap();

    let db = establish_connection(&db_path).await.unwrap();
    db.execute_unprepared("PRAGMA foreign_keys = OFF").await.unwrap();
    db.execute_unprepared("INSERT INTO reviews (score, comment, game_id) VALUES (1, 'lost', 404)")
        .await
        .unwrap();
    close_connection(db).await.unwrap();

    let err = execute(&cli(&db_path, &["check"])).await.unwrap_err();
    assert!(err.contains("关系问题"), "{err}");
}
