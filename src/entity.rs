//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义：games 为父表，reviews 通过外键 game_id 归属于 games。

pub mod prelude;

pub mod games;
pub mod reviews;
