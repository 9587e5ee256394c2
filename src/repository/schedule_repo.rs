// ==========================================
// 额外勤务排班系统 - 月度排班仓储
// ==========================================
// 职责: 管理 extra_schedule 表, 按 (勤务, 年, 月) 存取整月排班
// 说明: 载荷为 MonthlySchedule 的 JSON 序列化, 仓储不解读其内容;
//       写入为整体覆盖 (后写覆盖先写), 不提供删除
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::schedule::{CombinedSchedules, MonthKey, MonthlySchedule};
use crate::domain::types::Operation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct ScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleRepository {
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
            CREATE TABLE IF NOT EXISTS extra_schedule (
              operation TEXT NOT NULL,
              year INTEGER NOT NULL,
              month INTEGER NOT NULL,
              payload TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (operation, year, month)
            );

            CREATE INDEX IF NOT EXISTS idx_extra_schedule_month
              ON extra_schedule(year, month);
            "#,
        )?;
        Ok(())
    }

    /// 整月排班落库（Upsert 操作）
    ///
    /// 同一 (勤务, 年, 月) 已存在时整体覆盖。并发编辑不做仲裁,后写为准。
    pub fn upsert_schedule(&self, schedule: &MonthlySchedule) -> RepositoryResult<()> {
        let payload = serde_json::to_string(schedule)?;
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO extra_schedule (operation, year, month, payload, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(operation, year, month) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            params![
                schedule.operation.to_db_str(),
                schedule.month.year,
                schedule.month.month,
                payload,
                now,
            ],
        )?;
        Ok(())
    }

    /// 取某勤务某月的排班 (无记录返回 None)
    pub fn find_schedule(
        &self,
        operation: Operation,
        month: MonthKey,
    ) -> RepositoryResult<Option<MonthlySchedule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT payload
            FROM extra_schedule
            WHERE operation = ?1 AND year = ?2 AND month = ?3
            "#,
        )?;

        let result = stmt.query_row(
            params![operation.to_db_str(), month.year, month.month],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 取某勤务某月的排班, 无记录时返回空排班
    ///
    /// 缺失数据按零占用处理,与名额核算的约定一致。
    pub fn fetch_or_empty(
        &self,
        operation: Operation,
        month: MonthKey,
    ) -> RepositoryResult<MonthlySchedule> {
        Ok(self
            .find_schedule(operation, month)?
            .unwrap_or_else(|| MonthlySchedule::new(operation, month)))
    }

    /// 一次取回同月两个勤务的排班快照
    pub fn fetch_combined(&self, month: MonthKey) -> RepositoryResult<CombinedSchedules> {
        let mut combined = CombinedSchedules::new(month);
        for operation in Operation::ALL {
            combined.replace(self.fetch_or_empty(operation, month)?);
        }
        Ok(combined)
    }

    /// 列出已有排班数据的月份 (年月升序, 去重)
    pub fn list_months(&self) -> RepositoryResult<Vec<MonthKey>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT year, month
            FROM extra_schedule
            ORDER BY year ASC, month ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(MonthKey::new(row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
