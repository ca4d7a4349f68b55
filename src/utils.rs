pub mod logs;
pub mod output;
