// ==========================================
// 额外勤务排班系统 - 常务值班轮换表仓储
// ==========================================
// 职责: 管理 ordinary_roster 表, 按 (年, 月) 存取整月轮换表
// 说明: 轮换表由外部人事系统下发, 本系统按月整体覆盖,
//       载荷为 OrdinaryRoster 的 JSON 序列化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::roster::OrdinaryRoster;
use crate::domain::schedule::MonthKey;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct OrdinaryRosterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrdinaryRosterRepository {
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
            CREATE TABLE IF NOT EXISTS ordinary_roster (
              year INTEGER NOT NULL,
              month INTEGER NOT NULL,
              payload TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (year, month)
            );
            "#,
        )?;
        Ok(())
    }

    /// 整月轮换表落库（Upsert 操作, 整体覆盖）
    pub fn upsert_roster(&self, roster: &OrdinaryRoster) -> RepositoryResult<()> {
        let payload = serde_json::to_string(roster)?;
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO ordinary_roster (year, month, payload, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(year, month) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            params![roster.month.year, roster.month.month, payload, now],
        )?;
        Ok(())
    }

    /// 取某月轮换表 (无记录返回 None)
    pub fn find_roster(&self, month: MonthKey) -> RepositoryResult<Option<OrdinaryRoster>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT payload FROM ordinary_roster WHERE year = ?1 AND month = ?2",
        )?;

        let result = stmt.query_row(params![month.year, month.month], |row| {
            row.get::<_, String>(0)
        });

        match result {
            Ok(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 取某月轮换表, 无记录时返回空表
    ///
    /// 空表意味着该月无冲突可言,与冲突检测的约定一致。
    pub fn fetch_or_empty(&self, month: MonthKey) -> RepositoryResult<OrdinaryRoster> {
        Ok(self
            .find_roster(month)?
            .unwrap_or_else(|| OrdinaryRoster::new(month)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Team;

    fn setup_test_repo() -> OrdinaryRosterRepository {
        OrdinaryRosterRepository::new(":memory:").expect("Failed to create test repository")
    }

    fn april() -> MonthKey {
        MonthKey::new(2025, 4)
    }

    #[test]
    fn test_find_missing_roster_returns_none() {
        let repo = setup_test_repo();
        assert!(repo.find_roster(april()).expect("find").is_none());
    }

    #[test]
    fn test_upsert_and_find_roundtrip() {
        let repo = setup_test_repo();

        let mut roster = OrdinaryRoster::new(april());
        for day in 4..=9 {
            roster.set_duty(day, Team::TeamB);
        }
        roster.set_members(Team::TeamB, vec!["OLIMAR".to_string(), "BARROS".to_string()]);

        repo.upsert_roster(&roster).expect("upsert");

        let found = repo
            .find_roster(april())
            .expect("find")
            .expect("roster missing");
        assert_eq!(found, roster);
        assert_eq!(found.team_on_duty(7), Some(Team::TeamB));
        assert!(found.is_member(Team::TeamB, "OLIMAR"));
    }

    #[test]
    fn test_upsert_overwrites_month() {
        let repo = setup_test_repo();

        let mut first = OrdinaryRoster::new(april());
        first.set_duty(1, Team::TeamA);
        repo.upsert_roster(&first).expect("upsert 1");

        let mut second = OrdinaryRoster::new(april());
        second.set_duty(2, Team::TeamC);
        repo.upsert_roster(&second).expect("upsert 2");

        let found = repo
            .find_roster(april())
            .expect("find")
            .expect("roster missing");
        assert_eq!(found.team_on_duty(1), None);
        assert_eq!(found.team_on_duty(2), Some(Team::TeamC));
    }

    #[test]
    fn test_fetch_or_empty_for_missing_month() {
        let repo = setup_test_repo();
        let roster = repo.fetch_or_empty(april()).expect("fetch_or_empty");
        assert!(roster.is_empty());
        assert_eq!(roster.month, april());
    }

    #[test]
    fn test_months_are_independent() {
        let repo = setup_test_repo();

        let mut april_roster = OrdinaryRoster::new(april());
        april_roster.set_duty(1, Team::TeamA);
        repo.upsert_roster(&april_roster).expect("upsert");

        let may = MonthKey::new(2025, 5);
        assert!(repo.find_roster(may).expect("find").is_none());
    }
}
