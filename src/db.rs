// ==========================================
// 额外勤务排班系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 EXTRA_DUTY_ROSTER_DB_PATH（便于调试/测试/CI）
/// 2. 用户数据目录（开发环境使用独立目录，避免污染生产数据）
/// 3. 当前目录回退值
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("EXTRA_DUTY_ROSTER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖
    let mut path = PathBuf::from("./extra_duty_roster.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("extra-duty-roster-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("extra-duty-roster");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("extra_duty_roster.db");
    }

    path.to_string_lossy().to_string()
}
