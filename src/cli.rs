//! 命令行参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "game-reviews",
    version,
    about = "Games, their reviews, and the one-to-many relationship between them"
)]
pub struct Cli {
    /// SQLite 数据库文件路径（默认使用系统数据目录）
    #[arg(long, global = true, env = review_path::DB_PATH_ENV)]
    pub database: Option<PathBuf>,

    /// 日志级别：error / warn / info / debug / trace / off
    #[arg(long, global = true, env = "GAME_REVIEWS_LOG", default_value = "warn")]
    pub log_level: String,

    /// 以 JSON 输出结果
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 执行、回滚或查看迁移
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// 比较实体声明与数据库实际结构
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
    /// 写入示例数据
    Seed {
        /// JSON 种子文件，缺省时使用内置数据
        #[arg(long)]
        file: Option<PathBuf>,
        /// 写入前清空现有游戏与评论
        #[arg(long)]
        replace: bool,
    },
    /// 游戏相关操作
    Games {
        #[command(subcommand)]
        action: GamesAction,
    },
    /// 评论相关操作
    Reviews {
        #[command(subcommand)]
        action: ReviewsAction,
    },
    /// 检查双向关系是否一致
    Check,
    /// 使用 VACUUM INTO 热备份数据库
    Backup {
        /// 备份目录，缺省为数据库同级的 backups/
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// 交互式查询会话
    Shell,
}

#[derive(Debug, Subcommand)]
pub enum MigrateAction {
    /// 执行待执行的迁移
    Up {
        #[arg(short = 'n', long)]
        steps: Option<u32>,
    },
    /// 回滚迁移（默认一步）
    Down {
        #[arg(short = 'n', long)]
        steps: Option<u32>,
    },
    /// 查看迁移状态
    Status,
    /// 删除所有表并重新执行全部迁移
    Fresh,
}

#[derive(Debug, Subcommand)]
pub enum SchemaAction {
    /// 列出实体声明与数据库之间的差异
    Diff,
}

#[derive(Debug, Subcommand)]
pub enum GamesAction {
    /// 列出所有游戏
    List {
        /// 同时加载每个游戏的评论
        #[arg(long)]
        with_reviews: bool,
    },
    /// 查看游戏及其评论
    Show { id: i32 },
    /// 添加游戏
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        genre: String,
        #[arg(long)]
        platform: String,
        #[arg(long)]
        price: i32,
    },
    /// 删除游戏（级联删除其评论）
    Delete { id: i32 },
}

#[derive(Debug, Subcommand)]
pub enum ReviewsAction {
    /// 列出评论，可按游戏筛选
    List {
        #[arg(long)]
        game: Option<i32>,
    },
    /// 查看评论及其所属游戏
    Show { id: i32 },
    /// 添加评论
    Add {
        #[arg(long)]
        game: i32,
        #[arg(long)]
        score: i32,
        #[arg(long)]
        comment: String,
    },
    /// 删除评论
    Delete { id: i32 },
}
