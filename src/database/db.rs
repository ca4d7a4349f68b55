use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use migration::backup::path_to_sqlite_url;

/// 数据库备份结果
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupResult {
    pub success: bool,
    pub path: Option<String>,
    pub message: String,
}

// ==================== 数据库连接管理 ====================

/// Establish a SeaORM database connection to a SQLite file.
pub async fn establish_connection(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    // 1. 相对路径转换为绝对路径，url 构建需要绝对路径
    let db_path = std::path::absolute(db_path).map_err(|e| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "无法解析数据库路径 {}: {}",
            db_path.display(),
            e
        )))
    })?;

    // 2. 如果数据库不存在，创建目录
    if !db_path.exists() {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DbErr::Conn(RuntimeErr::Internal(format!("无法创建数据库目录: {}", e)))
            })?;
        }
        log::info!("首次运行，创建数据库: {}", db_path.display());
    } else {
        log::info!("使用数据库: {}", db_path.display());
    }

    // 3. 构建连接字符串并连接
    let connection_string = path_to_sqlite_url(&db_path)?;
    connect_url(connection_string).await
}

/// 使用任意连接字符串建立连接（测试中使用 `sqlite::memory:`）
///
/// sqlx 的 SQLite 驱动默认对每个连接开启 `PRAGMA foreign_keys = ON`，
/// reviews.game_id 的引用完整性由此保证。
pub async fn connect_url(url: impl Into<String>) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.into());
    options
        .max_connections(1) // 对于本地 SQLite，连接池大小为 1 即可
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    log::debug!("Database connection string: {}", options.get_url());

    Database::connect(options).await
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    Ok(())
}

// ==================== 数据库备份 ====================

/// 生成带时间戳的备份文件名
fn generate_backup_filename() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    format!("game_reviews_{}.db", timestamp)
}

/// 使用 VACUUM INTO 进行数据库热备份
///
/// VACUUM INTO 会创建一个优化后的数据库副本，同时保持原数据库的完整性，
/// 可以在连接打开时安全执行。目标目录不存在时自动创建。
pub async fn backup_database(
    db: &DatabaseConnection,
    backup_dir: &Path,
) -> Result<BackupResult, String> {
    fs::create_dir_all(backup_dir).map_err(|e| format!("无法创建备份目录: {}", e))?;

    let target_path: PathBuf = backup_dir.join(generate_backup_filename());
    if target_path.exists() {
        return Err(format!("备份文件已存在: {}", target_path.display()));
    }

    // SQLite 在 Windows 上也支持正斜杠，使用正斜杠可以避免转义问题
    let target_path_str = target_path
        .to_str()
        .ok_or("备份路径包含无效字符")?
        .replace('\\', "/");

    // 只需要转义单引号
    let escaped_path = target_path_str.replace('\'', "''");
    let vacuum_sql = format!("VACUUM INTO '{}'", escaped_path);

    db.execute_unprepared(&vacuum_sql)
        .await
        .map_err(|e| format!("VACUUM INTO 备份失败: {}", e))?;

    log::info!("数据库热备份成功: {}", target_path_str);

    Ok(BackupResult {
        success: true,
        path: Some(target_path_str),
        message: "数据库备份成功".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};

    #[tokio::test]
    async fn file_database_is_created_with_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("game_reviews.db");

        let conn = establish_connection(&db_path).await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        close_connection(conn).await.unwrap();

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn vacuum_backup_writes_a_copy() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("game_reviews.db");
        let conn = establish_connection(&db_path).await.unwrap();
        Migrator::up(&conn, None).await.unwrap();

        let backup_dir = dir.path().join("backups");
        let result = backup_database(&conn, &backup_dir).await.unwrap();

        assert!(result.success);
        let path = PathBuf::from(result.path.unwrap());
        assert!(path.exists());
        let expected_dir = backup_dir.to_string_lossy().replace('\\', "/");
        assert_eq!(path.parent(), Some(Path::new(&expected_dir)));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("game_reviews_") && name.ends_with(".db"), "{name}");
    }
}
