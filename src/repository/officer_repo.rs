// ==========================================
// 额外勤务排班系统 - 警员名册仓储
// ==========================================
// 职责: 管理 officer 表 (警员主数据)
// 说明: 展示名为主键; 名册顺序即选择列表顺序
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::officer::Officer;
use crate::domain::types::Team;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct OfficerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OfficerRepository {
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
            CREATE TABLE IF NOT EXISTS officer (
              name TEXT PRIMARY KEY,
              team TEXT,
              display_order INTEGER NOT NULL DEFAULT 0,
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_officer_team
              ON officer(team);
            CREATE INDEX IF NOT EXISTS idx_officer_display_order
              ON officer(display_order ASC);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Officer> {
        let team: Option<String> = row.get(1)?;
        Ok(Officer {
            name: row.get(0)?,
            team: team.as_deref().and_then(Team::from_str),
            display_order: row.get(2)?,
        })
    }

    /// 创建或更新警员（Upsert 操作）
    pub fn upsert(&self, officer: &Officer) -> RepositoryResult<()> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO officer (name, team, display_order, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name) DO UPDATE SET
                team = excluded.team,
                display_order = excluded.display_order,
                updated_at = excluded.updated_at
            "#,
            params![
                officer.name,
                officer.team.map(|t| t.to_db_str()),
                officer.display_order,
                now,
            ],
        )?;
        Ok(())
    }

    /// 按展示名查找警员
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Officer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, team, display_order FROM officer WHERE name = ?1",
        )?;

        let result = stmt.query_row(params![name], Self::map_row);
        match result {
            Ok(officer) => Ok(Some(officer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出全部警员 (按显示顺序, 再按名称)
    pub fn list_all(&self) -> RepositoryResult<Vec<Officer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT name, team, display_order
            FROM officer
            ORDER BY display_order ASC, name ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 列出全部警员展示名 (有序, 供选择列表与指派校验)
    pub fn list_names(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.list_all()?.into_iter().map(|o| o.name).collect())
    }

    /// 列出某队的警员展示名 (名称升序)
    pub fn list_names_by_team(&self, team: Team) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM officer WHERE team = ?1 ORDER BY name ASC",
        )?;

        let rows = stmt
            .query_map(params![team.to_db_str()], |row| row.get(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 按展示名删除警员
    pub fn delete_by_name(&self, name: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM officer WHERE name = ?1", params![name])?;
        Ok(affected)
    }

    /// 名册人数
    pub fn count(&self) -> RepositoryResult<u32> {
        let conn = self.get_conn()?;
        let count: u32 = conn.query_row("SELECT COUNT(*) FROM officer", [], |row| row.get(0))?;
        Ok(count)
    }
}
