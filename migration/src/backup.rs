use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use sea_orm_migration::sea_orm::DbErr;

/// 备份子目录名，位于数据库文件同级
const BACKUP_SUBDIR: &str = "backups";

/// 备份 SQLite 数据库文件。
///
/// 在应用待执行迁移之前调用：
/// - 数据库文件不存在时（首次运行）无需备份，返回 `Ok(None)`
/// - 否则复制到数据库所在目录的 `backups/` 子目录
pub fn backup_sqlite(db_path: &Path, label: &str) -> Result<Option<PathBuf>, DbErr> {
    if !db_path.exists() {
        return Ok(None);
    }

    let target_dir = db_path
        .parent()
        .map(|parent| parent.join(BACKUP_SUBDIR))
        .unwrap_or_else(|| PathBuf::from(BACKUP_SUBDIR));

    fs::create_dir_all(&target_dir)
        .map_err(|e| DbErr::Custom(format!("Failed to create backup dir: {}", e)))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = target_dir.join(format!("game_reviews_{}_{}.db", label, timestamp));

    fs::copy(db_path, &backup_path)
        .map_err(|e| DbErr::Custom(format!("Failed to copy database: {}", e)))?;

    Ok(Some(backup_path))
}

/// 将文件路径转换为 sqlite 连接 URL
pub fn path_to_sqlite_url(path: &Path) -> Result<String, DbErr> {
    let db_url = url::Url::from_file_path(path)
        .map_err(|_| DbErr::Custom(format!("Invalid database path: {}", path.display())))?;
    Ok(format!("sqlite:{}?mode=rwc", db_url.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_is_not_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("absent.db");
        assert!(backup_sqlite(&db_path, "pre").unwrap().is_none());
        assert!(!dir.path().join(BACKUP_SUBDIR).exists());
    }

    #[test]
    fn existing_database_is_copied_into_backups() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("game_reviews.db");
        fs::write(&db_path, b"sqlite bytes").unwrap();

        let backup = backup_sqlite(&db_path, "m20240301").unwrap().unwrap();

        assert_eq!(backup.parent().unwrap(), dir.path().join(BACKUP_SUBDIR));
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("game_reviews_m20240301_"));
        assert_eq!(fs::read(&backup).unwrap(), b"sqlite bytes");
    }

    #[test]
    fn absolute_path_becomes_rwc_url() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("game_reviews.db");
        let url = path_to_sqlite_url(&db_path).unwrap();
        assert!(url.starts_with("sqlite:"));
        assert!(url.ends_with("game_reviews.db?mode=rwc"));
    }

    #[test]
    fn relative_path_is_rejected() {
        assert!(path_to_sqlite_url(Path::new("relative.db")).is_err());
    }
}
