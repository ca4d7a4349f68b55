//! 交互式查询会话
//!
//! 在已打开的连接上逐行读取命令，双向遍历游戏与评论的关系。

use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::database::service;
use crate::utils::logs::{get_log_level, set_log_level};
use crate::utils::output;

const HELP: &str = "\
games              列出所有游戏
game <id>          查看游戏及其评论
reviews [<game>]   列出评论，可按游戏 ID 筛选
review <id>        查看评论及其所属游戏
check              检查双向关系是否一致
log [<level>]      查看或设置日志级别
help               显示帮助
quit | exit        退出";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    Games,
    Game(i32),
    Reviews(Option<i32>),
    Review(i32),
    Check,
    Log(Option<String>),
    Help,
    Quit,
}

fn parse_id(arg: Option<&str>, usage: &str) -> Result<i32, String> {
    let arg = arg.ok_or_else(|| format!("用法: {}", usage))?;
    arg.parse()
        .map_err(|_| format!("无效的 ID: {}（用法: {}）", arg, usage))
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(ShellCommand::Empty);
        };
        let arg = parts.next();
        if let Some(extra) = parts.next() {
            return Err(format!("多余的参数: {}", extra));
        }

        match head.to_lowercase().as_str() {
            "games" => Ok(ShellCommand::Games),
            "game" => parse_id(arg, "game <id>").map(ShellCommand::Game),
            "reviews" => match arg {
                None => Ok(ShellCommand::Reviews(None)),
                Some(_) => {
                    parse_id(arg, "reviews [<game>]").map(|id| ShellCommand::Reviews(Some(id)))
                }
            },
            "review" => parse_id(arg, "review <id>").map(ShellCommand::Review),
            "check" => Ok(ShellCommand::Check),
            "log" => Ok(ShellCommand::Log(arg.map(str::to_string))),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("未知命令: {}（输入 help 查看帮助）", other)),
        }
    }
}

/// 渲染结果：JSON 模式或文本模式
fn render<T, F>(value: &T, json: bool, text: F) -> Result<String, String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        output::to_json(value)
    } else {
        Ok(text(value))
    }
}

/// 执行单条命令，返回要输出的文本
async fn execute(
    db: &DatabaseConnection,
    command: ShellCommand,
    json: bool,
) -> Result<String, String> {
    match command {
        ShellCommand::Empty | ShellCommand::Quit => Ok(String::new()),
        ShellCommand::Help => Ok(HELP.to_string()),
        ShellCommand::Games => {
            let games = service::find_all_games(db).await?;
            render(games.as_slice(), json, output::render_games)
        }
        ShellCommand::Game(id) => match service::find_game_with_reviews(db, id).await? {
            Some(entry) => render(&entry, json, output::render_game_with_reviews),
            None => Err(format!("游戏 {} 不存在", id)),
        },
        ShellCommand::Reviews(game_id) => {
            let reviews = service::find_reviews(db, game_id).await?;
            render(reviews.as_slice(), json, output::render_reviews)
        }
        ShellCommand::Review(id) => match service::find_review_with_game(db, id).await? {
            Some(entry) => render(&entry, json, output::render_review_with_game),
            None => Err(format!("评论 {} 不存在", id)),
        },
        ShellCommand::Check => {
            let report = service::check_relationships(db).await?;
            render(&report, json, output::render_report)
        }
        ShellCommand::Log(None) => render(&get_log_level(), json, |level| {
            format!("{:?}", level).to_lowercase()
        }),
        ShellCommand::Log(Some(level)) => {
            set_log_level(&level)?;
            Ok(format!("日志级别已设置为 {}", level.to_lowercase()))
        }
    }
}

/// 运行交互式会话，直到输入 quit/exit 或输入结束
///
/// 单条命令出错只打印错误，不会结束会话
pub async fn run_shell<R, W>(
    db: &DatabaseConnection,
    input: R,
    out: &mut W,
    json: bool,
) -> Result<(), String>
where
    R: BufRead,
    W: Write,
{
    let io_err = |e: std::io::Error| format!("终端读写失败: {}", e);

    writeln!(out, "输入 help 查看可用命令").map_err(io_err)?;
    let mut lines = input.lines();
    loop {
        write!(out, "> ").map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let Some(line) = lines.next() else {
            writeln!(out).map_err(io_err)?;
            break;
        };
        let line = line.map_err(io_err)?;

        let command = match ShellCommand::parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "错误: {}", e).map_err(io_err)?;
                continue;
            }
        };

        match execute(db, command, json).await {
            Ok(text) if text.is_empty() => {}
            Ok(text) => writeln!(out, "{}", text).map_err(io_err)?,
            Err(e) => {
                log::debug!("shell command failed: {}", e);
                writeln!(out, "错误: {}", e).map_err(io_err)?
            }
        }
    }
    Ok(())
}
