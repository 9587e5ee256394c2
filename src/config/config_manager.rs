// ==========================================
// 额外勤务排班系统 - 配置管理器
// ==========================================
// 职责: 排班配置的加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 红线: 名额上限等数值必须经此处解析,引擎只接收解析后的值
// ==========================================

use crate::config::roster_config_trait::RosterConfigReader;
use crate::db::open_sqlite_connection;
use crate::engine::cap::CapAccountant;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
              scope_id TEXT NOT NULL,
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 参数
    /// - key: 配置键
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_config(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    ///
    /// # 参数
    /// - key: 配置键
    /// - value: 配置值（统一以字符串存储，读取方负责解析）
    pub fn set_config(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    ///
    /// # 参数
    /// - key: 配置键
    /// - default: 默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    // ===== 排班配置 =====

    /// 获取月度名额上限
    ///
    /// # 返回
    /// - u32: 单个警员每月跨 PMF + TRANSITO 的岗位总数上限
    ///
    /// # 说明
    /// 配置缺失或格式错误时回落到默认值 12。
    /// 引擎侧只接收解析后的 u32，不读取配置表。
    pub fn get_monthly_cap(&self) -> Result<u32, Box<dyn Error>> {
        let default = CapAccountant::DEFAULT_MONTHLY_CAP;
        let value =
            self.get_config_or_default(config_keys::MONTHLY_ASSIGNMENT_CAP, &default.to_string())?;
        let parsed = value.parse::<u32>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::MONTHLY_ASSIGNMENT_CAP,
                raw_value = %value,
                "月度名额上限配置格式错误，使用默认值"
            );
            default
        });
        Ok(parsed)
    }

    /// 获取冲突周期扫描间隔（秒，默认 300）
    pub fn get_conflict_scan_interval_secs(&self) -> Result<u64, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::CONFLICT_SCAN_INTERVAL_SECS, "300")?;
        Ok(value.parse::<u64>().unwrap_or(300))
    }

    /// 获取轮换表导入是否启用严格警员校验（默认 true）
    pub fn get_roster_import_strict_officers(&self) -> Result<bool, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::ROSTER_IMPORT_STRICT_OFFICERS, "true")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Ok(true), // 默认严格
        }
    }
}

// ==========================================
// RosterConfigReader Trait 实现
// ==========================================
#[async_trait]
impl RosterConfigReader for ConfigManager {
    async fn get_monthly_cap(&self) -> Result<u32, Box<dyn Error>> {
        ConfigManager::get_monthly_cap(self)
    }

    async fn get_conflict_scan_interval_secs(&self) -> Result<u64, Box<dyn Error>> {
        ConfigManager::get_conflict_scan_interval_secs(self)
    }

    async fn get_roster_import_strict_officers(&self) -> Result<bool, Box<dyn Error>> {
        ConfigManager::get_roster_import_strict_officers(self)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 名额
    pub const MONTHLY_ASSIGNMENT_CAP: &str = "monthly_assignment_cap";

    // 冲突扫描
    pub const CONFLICT_SCAN_INTERVAL_SECS: &str = "conflict_scan_interval_secs";

    // 导入
    pub const ROSTER_IMPORT_STRICT_OFFICERS: &str = "roster_import_strict_officers";
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_get_config_missing_returns_none() {
        let manager = memory_manager();
        let value = manager.get_config("no_such_key").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_set_and_get_config() {
        let manager = memory_manager();
        manager.set_config("monthly_assignment_cap", "10").unwrap();
        let value = manager.get_config("monthly_assignment_cap").unwrap();
        assert_eq!(value, Some("10".to_string()));
    }

    #[test]
    fn test_set_config_upsert_overwrites() {
        let manager = memory_manager();
        manager.set_config("monthly_assignment_cap", "10").unwrap();
        manager.set_config("monthly_assignment_cap", "15").unwrap();
        assert_eq!(
            manager.get_config("monthly_assignment_cap").unwrap(),
            Some("15".to_string())
        );
    }

    #[test]
    fn test_set_config_empty_key_rejected() {
        let manager = memory_manager();
        assert!(manager.set_config("  ", "1").is_err());
    }

    #[test]
    fn test_monthly_cap_default_12() {
        let manager = memory_manager();
        assert_eq!(manager.get_monthly_cap().unwrap(), 12);
    }

    #[test]
    fn test_monthly_cap_override() {
        let manager = memory_manager();
        manager.set_config(config_keys::MONTHLY_ASSIGNMENT_CAP, "8").unwrap();
        assert_eq!(manager.get_monthly_cap().unwrap(), 8);
    }

    #[test]
    fn test_monthly_cap_invalid_value_falls_back() {
        let manager = memory_manager();
        manager
            .set_config(config_keys::MONTHLY_ASSIGNMENT_CAP, "abc")
            .unwrap();
        assert_eq!(manager.get_monthly_cap().unwrap(), 12);
    }

    #[test]
    fn test_conflict_scan_interval_default_300() {
        let manager = memory_manager();
        assert_eq!(manager.get_conflict_scan_interval_secs().unwrap(), 300);
    }

    #[test]
    fn test_strict_officers_default_true() {
        let manager = memory_manager();
        assert!(manager.get_roster_import_strict_officers().unwrap());
    }

    #[test]
    fn test_strict_officers_false_variants() {
        let manager = memory_manager();
        for raw in ["false", "0", "no", "FALSE"] {
            manager
                .set_config(config_keys::ROSTER_IMPORT_STRICT_OFFICERS, raw)
                .unwrap();
            assert!(
                !manager.get_roster_import_strict_officers().unwrap(),
                "raw={} 应解析为 false",
                raw
            );
        }
    }

    #[tokio::test]
    async fn test_config_reader_trait_delegates() {
        let manager = memory_manager();
        manager.set_config(config_keys::MONTHLY_ASSIGNMENT_CAP, "9").unwrap();

        let reader: &dyn RosterConfigReader = &manager;
        assert_eq!(reader.get_monthly_cap().await.unwrap(), 9);
        assert_eq!(reader.get_conflict_scan_interval_secs().await.unwrap(), 300);
        assert!(reader.get_roster_import_strict_officers().await.unwrap());
    }
}
