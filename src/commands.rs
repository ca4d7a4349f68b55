//! 子命令分发

use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::path::Path;

use crate::cli::{Cli, Command, GamesAction, MigrateAction, ReviewsAction, SchemaAction};
use crate::database::db::backup_database;
use crate::database::dto::{InsertGameData, InsertReviewData};
use crate::database::service;
use crate::shell::run_shell;
use crate::utils::output;

/// 打印结果：JSON 模式或文本模式
fn emit<T, F>(json: bool, value: &T, text: F) -> Result<(), String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        println!("{}", output::to_json(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

/// 数据类命令要求迁移已全部执行
async fn ensure_migrated(db: &DatabaseConnection) -> Result<(), String> {
    let pending = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| format!("查询迁移状态失败: {}", e))?;
    if pending.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "数据库有 {} 个未执行的迁移，请先运行 `game-reviews migrate up`",
            pending.len()
        ))
    }
}

pub async fn dispatch(db: &DatabaseConnection, db_path: &Path, cli: &Cli) -> Result<(), String> {
    let json = cli.json;

    match &cli.command {
        Command::Migrate { action } => match action {
            MigrateAction::Up { steps } => {
                let applied = service::migrate_up(db, Some(db_path), *steps).await?;
                emit(json, &applied, |names| {
                    if names.is_empty() {
                        "没有待执行的迁移".to_string()
                    } else {
                        names
                            .iter()
                            .map(|name| format!("applied  {}", name))
                            .collect::<Vec<_>>()
                            .join("\n")
                    }
                })
            }
            MigrateAction::Down { steps } => {
                service::migrate_down(db, *steps).await?;
                let states = service::migration_status(db).await?;
                emit(json, &states, |s| output::render_migrations(s))
            }
            MigrateAction::Status => {
                let states = service::migration_status(db).await?;
                emit(json, &states, |s| output::render_migrations(s))
            }
            MigrateAction::Fresh => {
                service::migrate_fresh(db).await?;
                let states = service::migration_status(db).await?;
                emit(json, &states, |s| output::render_migrations(s))
            }
        },
        Command::Schema {
            action: SchemaAction::Diff,
        } => {
            let drift = service::schema_diff(db).await?;
            emit(json, &drift, |d| output::render_drift(d))
        }
        Command::Seed { file, replace } => {
            ensure_migrated(db).await?;
            let summary = service::seed_database(db, file.as_deref(), *replace).await?;
            emit(json, &summary, |s| {
                format!("已写入 {} 个游戏, {} 条评论", s.games, s.reviews)
            })
        }
        Command::Games { action } => {
            ensure_migrated(db).await?;
            games_command(db, action, json).await
        }
        Command::Reviews { action } => {
            ensure_migrated(db).await?;
            reviews_command(db, action, json).await
        }
        Command::Check => {
            ensure_migrated(db).await?;
            let report = service::check_relationships(db).await?;
            emit(json, &report, output::render_report)?;
            if report.is_consistent() {
                Ok(())
            } else {
                Err(format!("发现 {} 个关系问题", report.mismatches.len()))
            }
        }
        Command::Backup { dir } => {
            let backup_dir = dir
                .clone()
                .unwrap_or_else(|| review_path::get_default_db_backup_path(db_path));
            let result = backup_database(db, &backup_dir).await?;
            emit(json, &result, |r| {
                format!("{}: {}", r.message, r.path.as_deref().unwrap_or(""))
            })
        }
        Command::Shell => {
            ensure_migrated(db).await?;
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            run_shell(db, stdin.lock(), &mut stdout, json).await
        }
    }
}

async fn games_command(
    db: &DatabaseConnection,
    action: &GamesAction,
    json: bool,
) -> Result<(), String> {
    match action {
        GamesAction::List {
            with_reviews: false,
        } => {
            let games = service::find_all_games(db).await?;
            emit(json, games.as_slice(), output::render_games)
        }
        GamesAction::List { with_reviews: true } => {
            let entries = service::find_all_games_with_reviews(db).await?;
            emit(json, entries.as_slice(), |entries| {
                entries
                    .iter()
                    .map(output::render_game_with_reviews)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        GamesAction::Show { id } => match service::find_game_with_reviews(db, *id).await? {
            Some(entry) => emit(json, &entry, output::render_game_with_reviews),
            None => Err(format!("游戏 {} 不存在", id)),
        },
        GamesAction::Add {
            title,
            genre,
            platform,
            price,
        } => {
            let id = service::insert_game(
                db,
                InsertGameData {
                    title: title.clone(),
                    genre: genre.clone(),
                    platform: platform.clone(),
                    price: *price,
                },
            )
            .await?;
            log::info!("已添加游戏 {}", id);
            emit(json, &id, |id| format!("已添加游戏 #{}", id))
        }
        GamesAction::Delete { id } => {
            let affected = service::delete_game(db, *id).await?;
            if affected == 0 {
                return Err(format!("游戏 {} 不存在", id));
            }
            emit(json, &affected, |_| format!("已删除游戏 #{}（及其评论）", id))
        }
    }
}

async fn reviews_command(
    db: &DatabaseConnection,
    action: &ReviewsAction,
    json: bool,
) -> Result<(), String> {
    match action {
        ReviewsAction::List { game } => {
            let reviews = service::find_reviews(db, *game).await?;
            emit(json, reviews.as_slice(), output::render_reviews)
        }
        ReviewsAction::Show { id } => match service::find_review_with_game(db, *id).await? {
            Some(entry) => emit(json, &entry, output::render_review_with_game),
            None => Err(format!("评论 {} 不存在", id)),
        },
        ReviewsAction::Add {
            game,
            score,
            comment,
        } => {
            let id = service::insert_review(
                db,
                InsertReviewData {
                    game_id: *game,
                    score: *score,
                    comment: comment.clone(),
                },
            )
            .await?;
            log::info!("已为游戏 {} 添加评论 {}", game, id);
            emit(json, &id, |id| format!("已添加评论 #{}", id))
        }
        ReviewsAction::Delete { id } => {
            let affected = service::delete_review(db, *id).await?;
            if affected == 0 {
                return Err(format!("评论 {} 不存在", id));
            }
            emit(json, &affected, |_| format!("已删除评论 #{}", id))
        }
    }
}
