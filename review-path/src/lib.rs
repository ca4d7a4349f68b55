use std::path::PathBuf;

/// 数据库相关路径常量
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "game_reviews.db";
pub const DB_BACKUP_SUBDIR: &str = "backups";
pub const RESOURCE_DIR: &str = "resources";

/// 环境变量：显式指定数据库文件
pub const DB_PATH_ENV: &str = "GAME_REVIEWS_DATABASE";

/// 判断是否处于便携模式
///
/// 检测逻辑：检查可执行文件同级目录下是否存在 resources/data/game_reviews.db
pub fn is_portable_mode() -> bool {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let portable_data_dir = exe_dir.join(RESOURCE_DIR).join(DB_DATA_DIR);
            let portable_db_file = portable_data_dir.join(DB_FILE_NAME);
            return portable_data_dir.exists() && portable_db_file.exists();
        }
    }
    false
}

/// 获取基础数据目录
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    get_base_data_dir_for_mode(is_portable_mode())
}

/// 获取指定模式的基础数据目录
pub fn get_base_data_dir_for_mode(portable: bool) -> Result<PathBuf, String> {
    if portable {
        // 便携模式：使用可执行文件所在目录的 resources 子目录
        let exe_path =
            std::env::current_exe().map_err(|e| format!("无法获取可执行文件路径: {}", e))?;
        let exe_dir = exe_path
            .parent()
            .ok_or_else(|| "无法获取可执行文件父目录".to_string())?;
        Ok(exe_dir.join(RESOURCE_DIR))
    } else {
        get_system_data_dir()
    }
}

/// 获取系统数据目录（跨平台）
fn get_system_data_dir() -> Result<PathBuf, String> {
    use directories::ProjectDirs;

    let dirs = ProjectDirs::from("dev", "gamereviews", "game-reviews")
        .ok_or_else(|| "无法获取系统目录信息".to_string())?;
    Ok(dirs.data_dir().to_path_buf())
}

/// 获取数据库文件路径
///
/// 优先级：显式传入的路径 > GAME_REVIEWS_DATABASE 环境变量 > 便携模式 > 系统数据目录
///
/// 命令行经 clap 的 `env = DB_PATH_ENV` 已先读取该变量并作为 `explicit` 传入，这里的读取供库调用方使用
pub fn get_db_path(explicit: Option<PathBuf>) -> Result<PathBuf, String> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DB_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(get_base_data_dir()?.join(DB_DATA_DIR).join(DB_FILE_NAME))
}

/// 获取默认的数据库备份路径（数据库所在目录下的 backups 子目录）
pub fn get_default_db_backup_path(db_path: &std::path::Path) -> PathBuf {
    db_path
        .parent()
        .map(|parent| parent.join(DB_BACKUP_SUBDIR))
        .unwrap_or_else(|| PathBuf::from(DB_BACKUP_SUBDIR))
}
