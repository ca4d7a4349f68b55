//! 数据传输对象 (DTO)
//!
//! 命令行输入与输出使用的结构定义。

use crate::entity::{games, reviews};
use serde::{Deserialize, Serialize};

/// 用于插入游戏的数据结构
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertGameData {
    pub title: String,
    pub genre: String,
    pub platform: String,
    pub price: i32,
}

/// 用于插入评论的数据结构
///
/// game_id 必须指向已存在的游戏，否则由存储层拒绝
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertReviewData {
    pub game_id: i32,
    pub score: i32,
    pub comment: String,
}

/// 游戏及其全部评论（按插入顺序）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWithReviews {
    #[serde(flatten)]
    pub game: games::Model,
    pub reviews: Vec<reviews::Model>,
}

/// 评论及其所属游戏
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewWithGame {
    #[serde(flatten)]
    pub review: reviews::Model,
    pub game: Option<games::Model>,
}
