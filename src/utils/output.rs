//! 终端输出格式
//!
//! 文本模式下的渲染函数只拼接字符串，由调用方决定写到哪里；
//! `--json` 模式统一走 [`to_json`]。

use serde::Serialize;
use std::fmt::Write;

use crate::database::dto::{GameWithReviews, ReviewWithGame};
use crate::database::relations::{RelationshipMismatch, RelationshipReport};
use crate::database::schema::SchemaDrift;
use crate::database::service::MigrationState;
use crate::entity::{games, reviews};

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON 序列化失败: {}", e))
}

fn game_line(game: &games::Model) -> String {
    format!(
        "#{:<4} {} [{} / {}] ${}",
        game.id, game.title, game.genre, game.platform, game.price
    )
}

fn review_line(review: &reviews::Model) -> String {
    format!(
        "#{:<4} score {:>2}  {}",
        review.id, review.score, review.comment
    )
}

pub fn render_games(games: &[games::Model]) -> String {
    if games.is_empty() {
        return "(没有游戏)".to_string();
    }
    games.iter().map(game_line).collect::<Vec<_>>().join("\n")
}

pub fn render_reviews(reviews: &[reviews::Model]) -> String {
    if reviews.is_empty() {
        return "(没有评论)".to_string();
    }
    reviews.iter().map(review_line).collect::<Vec<_>>().join("\n")
}

pub fn render_game_with_reviews(entry: &GameWithReviews) -> String {
    let mut out = game_line(&entry.game);
    let _ = write!(out, "\n  {} 条评论", entry.reviews.len());
    for review in &entry.reviews {
        let _ = write!(out, "\n  {}", review_line(review));
    }
    out
}

pub fn render_review_with_game(entry: &ReviewWithGame) -> String {
    let game = match &entry.game {
        Some(game) => game_line(game),
        None => format!("(游戏 {} 不存在)", entry.review.game_id),
    };
    format!("{}\n  游戏: {}", review_line(&entry.review), game)
}

pub fn render_migrations(states: &[MigrationState]) -> String {
    states
        .iter()
        .map(|s| {
            let status = if s.applied { "applied" } else { "pending" };
            format!("{:<8} {}", status, s.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_drift(drift: &[SchemaDrift]) -> String {
    if drift.is_empty() {
        return "数据库结构与实体声明一致".to_string();
    }
    drift
        .iter()
        .map(|d| format!("- {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_report(report: &RelationshipReport) -> String {
    let mut out = format!(
        "检查了 {} 个游戏, {} 条评论",
        report.games_checked, report.reviews_checked
    );
    if report.is_consistent() {
        out.push_str("\n关系一致");
        return out;
    }
    for mismatch in &report.mismatches {
        let line = match mismatch {
            RelationshipMismatch::OrphanReview { review_id, game_id } => {
                format!("评论 {} 指向不存在的游戏 {}", review_id, game_id)
            }
            RelationshipMismatch::WrongParent {
                review_id,
                game_id,
                found_game_id,
            } => format!(
                "评论 {} 的 game_id 为 {}，关系却指向游戏 {}",
                review_id, game_id, found_game_id
            ),
            RelationshipMismatch::CountMismatch {
                game_id,
                related,
                filtered,
            } => format!(
                "游戏 {} 关系遍历得到 {} 条评论，外键筛选得到 {} 条",
                game_id, related, filtered
            ),
        };
        let _ = write!(out, "\n- {}", line);
    }
    out
}
