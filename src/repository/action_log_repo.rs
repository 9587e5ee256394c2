// ==========================================
// 额外勤务排班系统 - 操作日志仓储
// ==========================================
// 红线: API 层所有写入必须记录; Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::action_log::ActionLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS action_log (
              action_id TEXT PRIMARY KEY,
              action_type TEXT NOT NULL,
              action_ts TEXT NOT NULL,
              actor TEXT NOT NULL,
              operation TEXT,
              month_key TEXT,
              day INTEGER,
              slot_index INTEGER,
              officer TEXT,
              payload_json TEXT,
              detail TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_action_log_ts
              ON action_log(action_ts DESC);
            CREATE INDEX IF NOT EXISTS idx_action_log_month_key
              ON action_log(month_key);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<ActionLog> {
        let ts: String = row.get(2)?;
        let payload: Option<String> = row.get(9)?;
        Ok(ActionLog {
            action_id: row.get(0)?,
            action_type: row.get(1)?,
            action_ts: chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%d %H:%M:%S")
                .unwrap_or_else(|_| chrono::Local::now().naive_local()),
            actor: row.get(3)?,
            operation: row.get(4)?,
            month_key: row.get(5)?,
            day: row.get(6)?,
            slot_index: row.get(7)?,
            officer: row.get(8)?,
            payload_json: payload.and_then(|s| serde_json::from_str(&s).ok()),
            detail: row.get(10)?,
        })
    }

    /// 插入操作日志
    ///
    /// # 返回
    /// - `Ok(action_id)`: 成功插入,返回 action_id
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, action_type, action_ts, actor,
                operation, month_key, day, slot_index, officer,
                payload_json, detail
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                log.action_id,
                log.action_type,
                log.action_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                log.actor,
                log.operation,
                log.month_key,
                log.day,
                log.slot_index,
                log.officer,
                log.payload_json.as_ref().map(|v| v.to_string()),
                log.detail,
            ],
        )?;
        Ok(log.action_id.clone())
    }

    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   operation, month_key, day, slot_index, officer,
                   payload_json, detail
            FROM action_log
            WHERE action_id = ?1
            "#,
        )?;

        match stmt.query_row(params![action_id], Self::map_row) {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询最近的操作日志 (时间倒序)
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   operation, month_key, day, slot_index, officer,
                   payload_json, detail
            FROM action_log
            ORDER BY action_ts DESC, action_id DESC
            LIMIT ?1
            "#,
        )?;

        let logs = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询某排班周期的操作日志 (时间倒序)
    pub fn find_by_month_key(&self, month_key: &str) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, action_type, action_ts, actor,
                   operation, month_key, day, slot_index, officer,
                   payload_json, detail
            FROM action_log
            WHERE month_key = ?1
            ORDER BY action_ts DESC, action_id DESC
            "#,
        )?;

        let logs = stmt
            .query_map(params![month_key], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 日志总数
    pub fn count(&self) -> RepositoryResult<u32> {
        let conn = self.get_conn()?;
        let count: u32 = conn.query_row("SELECT COUNT(*) FROM action_log", [], |row| row.get(0))?;
        Ok(count)
    }
}
