use sea_orm_migration::prelude::*;

/// 迁移命令行：generate / up / down / status / fresh，通过 DATABASE_URL 指定数据库
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
