pub mod cli;
mod commands;
pub mod database;
pub mod entity;
mod shell;
mod utils;

use clap::Parser;

pub use cli::Cli;
use database::db;

/// 解析命令行、初始化日志后执行命令，失败时以非零状态退出
pub fn run() {
    let cli = Cli::parse();

    if let Err(e) = utils::logs::init_logging(&cli.log_level) {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("无法创建异步运行时: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(execute(&cli)) {
        log::error!("{}", e);
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}

/// 打开数据库、执行命令并关闭连接
pub async fn execute(cli: &Cli) -> Result<(), String> {
    let db_path = review_path::get_db_path(cli.database.clone())?;

    let conn = db::establish_connection(&db_path)
        .await
        .map_err(|e| format!("无法建立数据库连接: {}", e))?;
    log::debug!("数据库连接建立成功");

    let result = commands::dispatch(&conn, &db_path, cli).await;

    // 同步关闭数据库连接，确保退出前写入完成
    match db::close_connection(conn).await {
        Ok(_) => log::debug!("数据库连接已成功关闭"),
        Err(e) => log::error!("关闭数据库连接时出错: {}", e),
    }

    result
}
