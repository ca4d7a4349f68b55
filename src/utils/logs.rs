use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

/// 解析日志级别字符串（不区分大小写）
pub fn parse_log_level(level: &str) -> Result<log::LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "error" => Ok(log::LevelFilter::Error),
        "warn" => Ok(log::LevelFilter::Warn),
        "info" => Ok(log::LevelFilter::Info),
        "debug" => Ok(log::LevelFilter::Debug),
        "trace" => Ok(log::LevelFilter::Trace),
        "off" => Ok(log::LevelFilter::Off),
        other => Err(format!("无效的日志级别: {}", other)),
    }
}

/// 初始化日志
///
/// env_logger 本身放行所有级别，实际输出由 `log::max_level` 控制，
/// 以便运行时通过 [`set_log_level`] 动态调整。
pub fn init_logging(level: &str) -> Result<(), String> {
    let lf = parse_log_level(level)?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .filter_module("sqlx", log::LevelFilter::Warn)
        .format_timestamp_secs()
        .try_init()
        .map_err(|e| format!("日志初始化失败: {}", e))?;
    log::set_max_level(lf);
    Ok(())
}

/// 动态设置日志输出级别（不持久化）
pub fn set_log_level(level: &str) -> Result<(), String> {
    log::set_max_level(parse_log_level(level)?);
    Ok(())
}

/// 获取当前日志级别
pub fn get_log_level() -> LogLevel {
    match log::max_level() {
        log::LevelFilter::Error => LogLevel::Error,
        log::LevelFilter::Warn => LogLevel::Warn,
        log::LevelFilter::Info => LogLevel::Info,
        log::LevelFilter::Debug => LogLevel::Debug,
        log::LevelFilter::Trace => LogLevel::Trace,
        log::LevelFilter::Off => LogLevel::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_log_level("WARN").unwrap(), log::LevelFilter::Warn);
        assert_eq!(parse_log_level(" debug ").unwrap(), log::LevelFilter::Debug);
        assert_eq!(parse_log_level("off").unwrap(), log::LevelFilter::Off);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn runtime_level_change_is_visible() {
        set_log_level("trace").unwrap();
        assert_eq!(get_log_level(), LogLevel::Trace);
        assert!(set_log_level("loud").is_err());
        assert_eq!(get_log_level(), LogLevel::Trace);
    }
}
